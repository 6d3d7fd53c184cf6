use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Athlete, RosterEntry, RosteredAthlete, RulesetSnapshot, Tournament};

/// A tournament about to be written, with its already captured snapshot.
#[derive(Debug, Clone)]
pub struct NewTournament<'t> {
    pub name: &'t str,
    pub event_date: NaiveDate,
    pub reference_year: i32,
    pub snapshot: &'t RulesetSnapshot,
}

pub struct TournamentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewTournament<'_>) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournaments (tournament_id, name, event_date, reference_year, snapshot)
            VALUES (?, ?, ?, ?, ?)
            RETURNING tournament_id, name, event_date, reference_year, snapshot, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.event_date)
        .bind(new.reference_year)
        .bind(Json(new.snapshot))
        .fetch_one(self.pool)
        .await?;

        tracing::info!(
            tournament_id = %tournament.tournament_id,
            ruleset = %new.snapshot.ruleset_name,
            "Tournament created"
        );
        Ok(tournament)
    }

    /// List tournaments, most recent event first
    pub async fn list(&self) -> Result<Vec<Tournament>> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, event_date, reference_year, snapshot, created_at
            FROM tournaments
            ORDER BY event_date DESC, name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tournaments)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, event_date, reference_year, snapshot, created_at
            FROM tournaments
            WHERE tournament_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    /// Register an athlete, optionally pinned to a weight class label
    pub async fn add_to_roster(
        &self,
        tournament_id: Uuid,
        athlete_id: Uuid,
        weight_class: Option<&str>,
    ) -> Result<RosterEntry> {
        let entry = sqlx::query_as::<_, RosterEntry>(
            r#"
            INSERT INTO roster_entries (tournament_id, athlete_id, weight_class)
            VALUES (?, ?, ?)
            RETURNING tournament_id, athlete_id, weight_class, registered_at
            "#,
        )
        .bind(tournament_id)
        .bind(athlete_id)
        .bind(weight_class)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "Athlete is already registered for this tournament".to_string(),
                )
            } else {
                err.describe_constraint("Roster entry")
            }
        })?;

        tracing::debug!(%tournament_id, %athlete_id, "Athlete registered");
        Ok(entry)
    }

    pub async fn remove_from_roster(&self, tournament_id: Uuid, athlete_id: Uuid) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM roster_entries WHERE tournament_id = ? AND athlete_id = ?")
                .bind(tournament_id)
                .bind(athlete_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Registered athletes with their pinned weight class, by name
    pub async fn roster(&self, tournament_id: Uuid) -> Result<Vec<RosteredAthlete>> {
        let rows = sqlx::query(
            r#"
            SELECT a.athlete_id, a.first_name, a.last_name, a.birth_date, a.gender, a.weight,
                   a.rank, a.club_id, a.nationality, a.license_number, a.created_at,
                   r.weight_class AS roster_weight_class
            FROM roster_entries r
            JOIN athletes a ON a.athlete_id = r.athlete_id
            WHERE r.tournament_id = ?
            ORDER BY a.last_name, a.first_name
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        let roster = rows
            .iter()
            .map(|row| {
                Ok(RosteredAthlete {
                    athlete: Athlete::from_row(row)?,
                    weight_class: row.try_get("roster_weight_class")?,
                })
            })
            .collect::<sqlx::Result<Vec<_>>>()?;

        Ok(roster)
    }

    /// Delete a tournament and its roster
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE tournament_id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
