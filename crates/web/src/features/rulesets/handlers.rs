use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::ruleset::CreateRulesetRequest, models::Ruleset};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rulesets",
    responses(
        (status = 200, description = "All rulesets with their categories", body = Vec<Ruleset>)
    ),
    tag = "rulesets"
)]
pub async fn list_rulesets(State(db): State<Database>) -> Result<Response, WebError> {
    let rulesets = services::list_rulesets(db.pool()).await?;

    Ok(Json(rulesets).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rulesets/active",
    responses(
        (status = 200, description = "The active ruleset", body = Ruleset),
        (status = 404, description = "No ruleset is active")
    ),
    tag = "rulesets"
)]
pub async fn get_active_ruleset(State(db): State<Database>) -> Result<Response, WebError> {
    let ruleset = services::get_active_ruleset(db.pool()).await?;

    Ok(Json(ruleset).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rulesets/{id}",
    params(
        ("id" = Uuid, Path, description = "Ruleset ID")
    ),
    responses(
        (status = 200, description = "Ruleset found", body = Ruleset),
        (status = 404, description = "Ruleset not found")
    ),
    tag = "rulesets"
)]
pub async fn get_ruleset(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let ruleset = services::get_ruleset(db.pool(), id).await?;

    Ok(Json(ruleset).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rulesets",
    request_body = CreateRulesetRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Ruleset created successfully", body = Ruleset),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A ruleset with this name already exists")
    ),
    tag = "rulesets"
)]
pub async fn create_ruleset(
    State(db): State<Database>,
    Json(req): Json<CreateRulesetRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let ruleset = services::create_ruleset(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(ruleset)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/rulesets/{id}/activate",
    params(
        ("id" = Uuid, Path, description = "Ruleset ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ruleset is now the only active one", body = Ruleset),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ruleset not found")
    ),
    tag = "rulesets"
)]
pub async fn activate_ruleset(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let ruleset = services::activate_ruleset(db.pool(), id).await?;

    Ok(Json(ruleset).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/rulesets/{id}",
    params(
        ("id" = Uuid, Path, description = "Ruleset ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Ruleset deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ruleset not found")
    ),
    tag = "rulesets"
)]
pub async fn delete_ruleset(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_ruleset(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
