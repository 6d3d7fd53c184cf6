use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{AgeCategory, CategoryGender};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_age_bounds"))]
pub struct AgeCategoryRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Category name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(range(min = 0, max = 150))]
    pub min_age: i32,

    #[validate(range(min = 0, max = 150))]
    pub max_age: i32,

    pub gender: CategoryGender,
}

fn validate_age_bounds(category: &AgeCategoryRequest) -> Result<(), ValidationError> {
    if category.min_age > category.max_age {
        return Err(ValidationError::new("invalid_age_range")
            .with_message("min_age must not exceed max_age".into()));
    }
    Ok(())
}

impl From<AgeCategoryRequest> for AgeCategory {
    fn from(req: AgeCategoryRequest) -> Self {
        AgeCategory::new(req.name, req.min_age, req.max_age, req.gender)
    }
}

/// Request payload for creating a ruleset with its ordered categories.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRulesetRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Make this the active ruleset once created.
    #[serde(default)]
    pub activate: bool,

    #[validate(length(min = 1, message = "At least one category is required"))]
    #[validate(nested)]
    pub categories: Vec<AgeCategoryRequest>,
}

impl CreateRulesetRequest {
    pub fn age_categories(&self) -> Vec<AgeCategory> {
        self.categories
            .iter()
            .cloned()
            .map(AgeCategory::from)
            .collect()
    }
}
