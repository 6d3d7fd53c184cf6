use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{RulesetSnapshot, Tournament, WeightClass};

/// Request payload for creating a tournament. The ruleset defaults to the
/// active one and the reference year to the event's year.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTournamentRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub event_date: NaiveDate,

    #[validate(range(min = 1900, max = 2200))]
    pub reference_year: Option<i32>,

    pub ruleset_id: Option<Uuid>,

    /// Tournament weight classes keyed by age category name.
    #[serde(default)]
    pub weight_classes: BTreeMap<String, Vec<WeightClass>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddRosterEntryRequest {
    pub athlete_id: Uuid,

    #[validate(length(min = 1, max = 64))]
    pub weight_class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
    pub tournament_id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
    pub reference_year: i32,
    pub snapshot: RulesetSnapshot,
    pub created_at: NaiveDateTime,
}

impl From<Tournament> for TournamentResponse {
    fn from(tournament: Tournament) -> Self {
        Self {
            tournament_id: tournament.tournament_id,
            name: tournament.name,
            event_date: tournament.event_date,
            reference_year: tournament.reference_year,
            snapshot: tournament.snapshot.0,
            created_at: tournament.created_at,
        }
    }
}
