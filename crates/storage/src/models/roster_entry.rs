use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Athlete;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RosterEntry {
    pub tournament_id: Uuid,
    pub athlete_id: Uuid,
    /// Explicitly assigned weight class label, if any.
    pub weight_class: Option<String>,
    pub registered_at: chrono::NaiveDateTime,
}

/// A roster entry joined with the athlete it registers.
#[derive(Debug, Clone)]
pub struct RosteredAthlete {
    pub athlete: Athlete,
    pub weight_class: Option<String>,
}
