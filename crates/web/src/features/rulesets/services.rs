use sqlx::SqlitePool;
use storage::{
    dto::ruleset::CreateRulesetRequest,
    error::Result,
    models::Ruleset,
    repository::{NewRuleset, RulesetRepository},
    services::check_categories,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

pub async fn list_rulesets(pool: &SqlitePool) -> Result<Vec<Ruleset>> {
    RulesetRepository::new(pool).list().await
}

pub async fn get_ruleset(pool: &SqlitePool, id: Uuid) -> Result<Ruleset> {
    RulesetRepository::new(pool).find_by_id(id).await
}

pub async fn get_active_ruleset(pool: &SqlitePool) -> Result<Ruleset> {
    RulesetRepository::new(pool).find_active().await
}

/// The given ruleset, or the active one when no id is supplied
pub async fn resolve_ruleset(pool: &SqlitePool, id: Option<Uuid>) -> Result<Ruleset> {
    match id {
        Some(id) => get_ruleset(pool, id).await,
        None => get_active_ruleset(pool).await,
    }
}

/// Create a ruleset after checking its category table for consistency
pub async fn create_ruleset(pool: &SqlitePool, request: &CreateRulesetRequest) -> WebResult<Ruleset> {
    let categories = request.age_categories();

    let check = check_categories(&categories);
    if !check.errors.is_empty() {
        return Err(WebError::BadRequest(check.errors.join("; ")));
    }
    for warning in &check.warnings {
        tracing::warn!(ruleset = %request.name, "{}", warning);
    }

    let new = NewRuleset {
        name: &request.name,
        description: request.description.as_deref(),
        categories: &categories,
    };

    Ok(RulesetRepository::new(pool).create(&new, request.activate).await?)
}

pub async fn activate_ruleset(pool: &SqlitePool, id: Uuid) -> Result<Ruleset> {
    RulesetRepository::new(pool).set_active(id).await
}

pub async fn delete_ruleset(pool: &SqlitePool, id: Uuid) -> Result<()> {
    RulesetRepository::new(pool).delete(id).await
}
