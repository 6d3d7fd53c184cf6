use sqlx::SqlitePool;
use storage::{
    dto::{
        athlete::{CreateAthleteRequest, UpdateAthleteRequest},
        classification::EligibilityResponse,
        common::PaginationParams,
    },
    error::Result,
    models::Athlete,
    repository::{AthleteRepository, RulesetRepository},
    services::AthleteSnapshot,
};
use uuid::Uuid;

use crate::features::classification::services::{current_year, eligibility_report};

/// List one page of athletes
pub async fn list_athletes(pool: &SqlitePool, params: &PaginationParams) -> Result<(Vec<Athlete>, i64)> {
    let repo = AthleteRepository::new(pool);
    repo.list(params).await
}

/// Get athlete by ID
pub async fn get_athlete(pool: &SqlitePool, id: Uuid) -> Result<Athlete> {
    let repo = AthleteRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create a new athlete
pub async fn create_athlete(pool: &SqlitePool, request: &CreateAthleteRequest) -> Result<Athlete> {
    let repo = AthleteRepository::new(pool);
    repo.create(request).await
}

/// Update an athlete
pub async fn update_athlete(
    pool: &SqlitePool,
    id: Uuid,
    request: &UpdateAthleteRequest,
) -> Result<Athlete> {
    let repo = AthleteRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(id, &existing, request).await
}

/// Delete an athlete
pub async fn delete_athlete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let repo = AthleteRepository::new(pool);
    repo.delete(id).await
}

/// Check a stored athlete against the active ruleset
pub async fn athlete_eligibility(
    pool: &SqlitePool,
    id: Uuid,
    reference_year: Option<i32>,
) -> Result<EligibilityResponse> {
    let athlete = AthleteRepository::new(pool).find_by_id(id).await?;
    let ruleset = RulesetRepository::new(pool).find_active().await?;
    let reference_year = reference_year.unwrap_or_else(current_year);

    Ok(eligibility_report(
        &AthleteSnapshot::from(&athlete),
        &ruleset,
        reference_year,
    ))
}
