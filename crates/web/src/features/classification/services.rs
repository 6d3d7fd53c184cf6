use chrono::Datelike;
use sqlx::SqlitePool;
use storage::{
    dto::classification::{
        EligibilityRequest, EligibilityResponse, ResolveAgeCategoryRequest,
        ResolveAgeCategoryResponse,
    },
    error::Result,
    models::Ruleset,
    services::{
        AthleteSnapshot, bucket_weight_class, classification::age_in, resolve_age_category,
        validate_eligibility,
    },
};

use crate::features::rulesets::services::resolve_ruleset;

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Resolve against inline categories when supplied, otherwise against the
/// requested or active ruleset
pub async fn resolve_category(
    pool: &SqlitePool,
    request: &ResolveAgeCategoryRequest,
) -> Result<ResolveAgeCategoryResponse> {
    let reference_year = request.reference_year.unwrap_or_else(current_year);
    let birth_date = request.birth_date.as_deref();

    let category = match &request.categories {
        Some(categories) => {
            resolve_age_category(birth_date, request.gender, categories, reference_year)
        }
        None => {
            let ruleset = resolve_ruleset(pool, request.ruleset_id).await?;
            resolve_age_category(birth_date, request.gender, &ruleset.categories, reference_year)
        }
    };

    Ok(ResolveAgeCategoryResponse {
        category,
        age: age_in(birth_date, reference_year),
        reference_year,
    })
}

pub async fn check_eligibility(
    pool: &SqlitePool,
    request: &EligibilityRequest,
) -> Result<EligibilityResponse> {
    let ruleset = resolve_ruleset(pool, request.ruleset_id).await?;
    let reference_year = request.reference_year.unwrap_or_else(current_year);

    Ok(eligibility_report(&request.athlete, &ruleset, reference_year))
}

/// Category, standard division and conflicts for one athlete
pub fn eligibility_report(
    athlete: &AthleteSnapshot,
    ruleset: &Ruleset,
    reference_year: i32,
) -> EligibilityResponse {
    let conflicts = validate_eligibility(athlete, ruleset, reference_year);

    EligibilityResponse {
        athlete_id: athlete.athlete_id,
        ruleset_id: ruleset.ruleset_id,
        ruleset_name: ruleset.name.clone(),
        reference_year,
        age_category: resolve_age_category(
            athlete.birth_date.as_deref(),
            athlete.gender,
            &ruleset.categories,
            reference_year,
        ),
        weight_division: bucket_weight_class(athlete.gender, athlete.weight).to_string(),
        conflicts,
    }
}
