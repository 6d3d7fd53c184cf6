use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::classification::{
        BucketWeightRequest, BucketWeightResponse, EligibilityRequest, EligibilityResponse,
        ResolveAgeCategoryRequest, ResolveAgeCategoryResponse, WeightDivisionsResponse,
    },
    models::Gender,
    services::{bucket_weight_class, weight_divisions},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/classification/age-category",
    request_body = ResolveAgeCategoryRequest,
    responses(
        (status = 200, description = "Resolved age category, or \"Unclassified\"", body = ResolveAgeCategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Ruleset not found or none active")
    ),
    tag = "classification"
)]
pub async fn resolve_age_category(
    State(db): State<Database>,
    Json(req): Json<ResolveAgeCategoryRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::resolve_category(db.pool(), &req).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/classification/weight-class",
    request_body = BucketWeightRequest,
    responses(
        (status = 200, description = "Standard weight division, or \"Unclassified\"", body = BucketWeightResponse)
    ),
    tag = "classification"
)]
pub async fn bucket_weight(Json(req): Json<BucketWeightRequest>) -> Result<Response, WebError> {
    let weight_class = bucket_weight_class(req.gender, req.weight).to_string();

    Ok(Json(BucketWeightResponse { weight_class }).into_response())
}

#[utoipa::path(
    get,
    path = "/api/classification/weight-divisions/{gender}",
    params(
        ("gender" = String, Path, description = "male or female")
    ),
    responses(
        (status = 200, description = "Standard divisions, lightest first", body = WeightDivisionsResponse),
        (status = 400, description = "Unknown gender")
    ),
    tag = "classification"
)]
pub async fn list_weight_divisions(Path(gender): Path<String>) -> Result<Response, WebError> {
    let gender: Gender = gender
        .parse()
        .map_err(|e: storage::models::UnknownGender| WebError::BadRequest(e.to_string()))?;

    let divisions = weight_divisions(gender)
        .iter()
        .map(|d| d.to_string())
        .collect();

    Ok(Json(WeightDivisionsResponse { gender, divisions }).into_response())
}

#[utoipa::path(
    post,
    path = "/api/classification/eligibility",
    request_body = EligibilityRequest,
    responses(
        (status = 200, description = "Eligibility report; unsaved athletes have no conflicts", body = EligibilityResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Ruleset not found or none active")
    ),
    tag = "classification"
)]
pub async fn check_eligibility(
    State(db): State<Database>,
    Json(req): Json<EligibilityRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::check_eligibility(db.pool(), &req).await?;

    Ok(Json(response).into_response())
}
