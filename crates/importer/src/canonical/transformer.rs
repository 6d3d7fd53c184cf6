use super::models::*;
use crate::{ImporterError, Result};
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use storage::dto::athlete::CreateAthleteRequest;
use storage::dto::club::CreateClubRequest;
use storage::models::{Gender, NormalizedAthleteName};
use storage::repository::{
    NewRuleset,
    athlete::{find_matching, insert_athlete},
    club::{find_club_by_name, insert_club},
    ruleset::{activate_ruleset, find_ruleset_id_by_name, insert_ruleset},
};
use tracing::{debug, info};
use uuid::Uuid;

/// What an import wrote, and what it found already stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub rulesets_created: usize,
    pub rulesets_reused: usize,
    pub active_ruleset: Option<Uuid>,
    pub clubs_created: usize,
    pub clubs_reused: usize,
    pub athletes_created: usize,
    pub athletes_skipped: usize,
}

pub struct CanonicalTransformer<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CanonicalTransformer<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes the whole file in one transaction. Rulesets and clubs already
    /// stored under the same name are reused, athletes already stored
    /// (same name and birth date) are skipped.
    pub async fn import_to_database(&self, canonical: &CanonicalFormat) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        let mut tx = self.pool.begin().await?;

        self.import_rulesets(&canonical.rulesets, &mut tx, &mut summary)
            .await?;
        let club_ids = self
            .import_clubs(&canonical.clubs, &mut tx, &mut summary)
            .await?;

        for athlete in &canonical.athletes {
            self.import_athlete(athlete, &club_ids, &mut tx, &mut summary)
                .await?;
        }

        tx.commit().await?;

        info!(
            rulesets = summary.rulesets_created,
            clubs = summary.clubs_created,
            athletes = summary.athletes_created,
            skipped = summary.athletes_skipped,
            "Import committed"
        );
        Ok(summary)
    }

    async fn import_rulesets(
        &self,
        rulesets: &[RulesetData],
        conn: &mut SqliteConnection,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        let mut to_activate = None;

        for ruleset in rulesets {
            let ruleset_id = match find_ruleset_id_by_name(conn, &ruleset.name).await? {
                Some(id) => {
                    info!("Ruleset '{}' already exists, keeping stored version", ruleset.name);
                    summary.rulesets_reused += 1;
                    id
                }
                None => {
                    let new = NewRuleset {
                        name: &ruleset.name,
                        description: ruleset.description.as_deref(),
                        categories: &ruleset.categories,
                    };
                    summary.rulesets_created += 1;
                    insert_ruleset(conn, &new).await?
                }
            };

            if ruleset.activate {
                to_activate = Some(ruleset_id);
            }
        }

        if let Some(ruleset_id) = to_activate {
            activate_ruleset(conn, ruleset_id).await?;
            summary.active_ruleset = Some(ruleset_id);
        }

        Ok(())
    }

    async fn import_clubs(
        &self,
        clubs: &[ClubData],
        conn: &mut SqliteConnection,
        summary: &mut ImportSummary,
    ) -> Result<HashMap<String, Uuid>> {
        let mut club_ids = HashMap::new();

        for club in clubs {
            let club_id = match find_club_by_name(conn, &club.name).await? {
                Some(existing) => {
                    summary.clubs_reused += 1;
                    existing.club_id
                }
                None => {
                    let request = CreateClubRequest {
                        name: club.name.clone(),
                        city: club.city.clone(),
                    };
                    summary.clubs_created += 1;
                    insert_club(conn, &request).await?.club_id
                }
            };
            club_ids.insert(club.name.clone(), club_id);
        }

        Ok(club_ids)
    }

    async fn resolve_club(
        &self,
        name: &str,
        club_ids: &HashMap<String, Uuid>,
        conn: &mut SqliteConnection,
    ) -> Result<Uuid> {
        if let Some(id) = club_ids.get(name) {
            return Ok(*id);
        }

        find_club_by_name(conn, name)
            .await?
            .map(|club| club.club_id)
            .ok_or_else(|| ImporterError::TransformationError(format!("Unknown club '{}'", name)))
    }

    async fn import_athlete(
        &self,
        athlete: &AthleteData,
        club_ids: &HashMap<String, Uuid>,
        conn: &mut SqliteConnection,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        let name = NormalizedAthleteName::new(&athlete.first_name, &athlete.last_name);
        if let Some(existing) = find_matching(conn, &name, athlete.birth_date.as_deref()).await? {
            debug!(
                athlete_id = %existing.athlete_id,
                "Athlete '{}' already stored, skipping",
                athlete.label()
            );
            summary.athletes_skipped += 1;
            return Ok(());
        }

        let gender: Gender = athlete.gender.parse().map_err(|e| {
            ImporterError::TransformationError(format!("Athlete '{}': {}", athlete.label(), e))
        })?;
        let club_id = match athlete.club.as_deref() {
            Some(club) => Some(self.resolve_club(club, club_ids, conn).await?),
            None => None,
        };

        let request = CreateAthleteRequest {
            first_name: athlete.first_name.trim().to_string(),
            last_name: athlete.last_name.trim().to_string(),
            birth_date: athlete.birth_date.clone(),
            gender,
            weight: athlete.weight.unwrap_or(Decimal::ZERO),
            rank: athlete.rank.clone(),
            club_id,
            nationality: athlete.nationality.clone(),
            license_number: athlete.license_number.clone(),
        };
        insert_athlete(conn, &request).await?;
        summary.athletes_created += 1;

        Ok(())
    }
}
