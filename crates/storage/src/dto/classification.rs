use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{AgeCategory, Gender};
use crate::services::{AthleteSnapshot, EligibilityConflict};

/// Resolve against inline `categories` when given, otherwise against
/// `ruleset_id` or the active ruleset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResolveAgeCategoryRequest {
    pub birth_date: Option<String>,
    pub gender: Gender,
    #[validate(range(min = 1900, max = 2200))]
    pub reference_year: Option<i32>,
    pub ruleset_id: Option<Uuid>,
    pub categories: Option<Vec<AgeCategory>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolveAgeCategoryResponse {
    pub category: String,
    pub age: Option<i32>,
    pub reference_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BucketWeightRequest {
    pub gender: Gender,
    pub weight: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BucketWeightResponse {
    pub weight_class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeightDivisionsResponse {
    pub gender: Gender,
    pub divisions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EligibilityRequest {
    pub athlete: AthleteSnapshot,
    pub ruleset_id: Option<Uuid>,
    #[validate(range(min = 1900, max = 2200))]
    pub reference_year: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Validate, IntoParams)]
pub struct EligibilityQuery {
    /// Defaults to the current year.
    #[validate(range(min = 1900, max = 2200))]
    pub reference_year: Option<i32>,
}

/// Full eligibility picture for one athlete under one ruleset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EligibilityResponse {
    pub athlete_id: Option<Uuid>,
    pub ruleset_id: Uuid,
    pub ruleset_name: String,
    pub reference_year: i32,
    pub age_category: String,
    pub weight_division: String,
    pub conflicts: Vec<EligibilityConflict>,
}
