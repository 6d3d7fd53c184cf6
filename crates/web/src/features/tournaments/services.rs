use chrono::Datelike;
use sqlx::SqlitePool;
use storage::{
    dto::tournament::{AddRosterEntryRequest, CreateTournamentRequest},
    error::Result,
    models::{RosterEntry, RulesetSnapshot, Tournament},
    repository::{NewTournament, TournamentRepository},
    services::{RosterReport, aggregate_roster, ruleset_catalog::snapshot_of, weight_class::parse_division},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::rulesets::services::resolve_ruleset;

pub async fn list_tournaments(pool: &SqlitePool) -> Result<Vec<Tournament>> {
    TournamentRepository::new(pool).list().await
}

pub async fn get_tournament(pool: &SqlitePool, id: Uuid) -> Result<Tournament> {
    TournamentRepository::new(pool).find_by_id(id).await
}

/// Create a tournament, freezing the chosen (or active) ruleset together
/// with the tournament's weight classes
pub async fn create_tournament(
    pool: &SqlitePool,
    request: &CreateTournamentRequest,
) -> WebResult<Tournament> {
    let ruleset = resolve_ruleset(pool, request.ruleset_id).await?;

    for (category, classes) in &request.weight_classes {
        if !ruleset.categories.iter().any(|c| &c.name == category) {
            return Err(WebError::BadRequest(format!(
                "Weight classes given for unknown category '{}'",
                category
            )));
        }
        if let Some(class) = classes.iter().find(|c| c.limit <= rust_decimal::Decimal::ZERO) {
            return Err(WebError::BadRequest(format!(
                "Weight class '{}' must have a positive limit",
                class.label
            )));
        }
    }

    let snapshot = snapshot_of(
        &ruleset,
        request.weight_classes.clone(),
        chrono::Utc::now().naive_utc(),
    );
    let new = NewTournament {
        name: &request.name,
        event_date: request.event_date,
        reference_year: request
            .reference_year
            .unwrap_or_else(|| request.event_date.year()),
        snapshot: &snapshot,
    };

    Ok(TournamentRepository::new(pool).create(&new).await?)
}

pub async fn delete_tournament(pool: &SqlitePool, id: Uuid) -> Result<()> {
    TournamentRepository::new(pool).delete(id).await
}

/// Grouped roster with conflicts, classified against the frozen snapshot
pub async fn roster_report(pool: &SqlitePool, id: Uuid) -> Result<RosterReport> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_id(id).await?;
    let roster = repo.roster(id).await?;

    Ok(aggregate_roster(
        &roster,
        &tournament.snapshot.0,
        tournament.reference_year,
    ))
}

fn is_known_weight_class(snapshot: &RulesetSnapshot, label: &str) -> bool {
    snapshot
        .weight_classes
        .values()
        .flatten()
        .any(|c| c.label == label)
        || parse_division(label).is_some()
}

pub async fn register_athlete(
    pool: &SqlitePool,
    tournament_id: Uuid,
    request: &AddRosterEntryRequest,
) -> WebResult<RosterEntry> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_id(tournament_id).await?;

    if let Some(label) = request.weight_class.as_deref() {
        if !is_known_weight_class(&tournament.snapshot.0, label) {
            return Err(WebError::BadRequest(format!("Unknown weight class '{}'", label)));
        }
    }

    Ok(repo
        .add_to_roster(tournament_id, request.athlete_id, request.weight_class.as_deref())
        .await?)
}

pub async fn unregister_athlete(pool: &SqlitePool, tournament_id: Uuid, athlete_id: Uuid) -> Result<()> {
    TournamentRepository::new(pool)
        .remove_from_roster(tournament_id, athlete_id)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use storage::models::WeightClass;

    fn snapshot() -> RulesetSnapshot {
        let mut weight_classes = BTreeMap::new();
        weight_classes.insert(
            "Cadets".to_string(),
            vec![WeightClass::new("50".parse().unwrap(), "-50kg")],
        );
        RulesetSnapshot {
            ruleset_id: Uuid::nil(),
            ruleset_name: "2025".to_string(),
            categories: Vec::new(),
            weight_classes,
            captured_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_weight_class_labels() {
        let snapshot = snapshot();
        assert!(is_known_weight_class(&snapshot, "-50kg"));
        assert!(is_known_weight_class(&snapshot, "+100kg"));
        assert!(!is_known_weight_class(&snapshot, "heavy"));
    }
}
