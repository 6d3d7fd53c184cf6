use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::tournament::{AddRosterEntryRequest, CreateTournamentRequest, TournamentResponse},
    models::RosterEntry,
    services::RosterReport,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tournaments",
    responses(
        (status = 200, description = "All tournaments, latest event first", body = Vec<TournamentResponse>)
    ),
    tag = "tournaments"
)]
pub async fn list_tournaments(State(db): State<Database>) -> Result<Response, WebError> {
    let tournaments = services::list_tournaments(db.pool()).await?;

    let response: Vec<TournamentResponse> = tournaments
        .into_iter()
        .map(TournamentResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Tournament with its ruleset snapshot", body = TournamentResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_tournament(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::get_tournament(db.pool(), id).await?;

    Ok(Json(TournamentResponse::from(tournament)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments",
    request_body = CreateTournamentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Tournament created with a frozen ruleset snapshot", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ruleset not found or none active")
    ),
    tag = "tournaments"
)]
pub async fn create_tournament(
    State(db): State<Database>,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let tournament = services::create_tournament(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(TournamentResponse::from(tournament))).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Tournament and roster deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn delete_tournament(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_tournament(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/roster",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Roster grouped by category and weight class, with conflicts", body = RosterReport),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_roster(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let report = services::roster_report(db.pool(), id).await?;

    Ok(Json(report).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/roster",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    request_body = AddRosterEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Athlete registered", body = RosterEntry),
        (status = 400, description = "Validation error or unknown weight class"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Already registered or unknown athlete")
    ),
    tag = "tournaments"
)]
pub async fn add_roster_entry(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddRosterEntryRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let entry = services::register_athlete(db.pool(), id, &req).await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}/roster/{athlete_id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("athlete_id" = Uuid, Path, description = "Athlete ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Athlete removed from the roster"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Athlete is not on this roster")
    ),
    tag = "tournaments"
)]
pub async fn remove_roster_entry(
    State(db): State<Database>,
    Path((id, athlete_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    services::unregister_athlete(db.pool(), id, athlete_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
