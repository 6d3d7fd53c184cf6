use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::RulesetSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub name: String,
    pub event_date: chrono::NaiveDate,
    pub reference_year: i32,
    pub snapshot: Json<RulesetSnapshot>,
    pub created_at: chrono::NaiveDateTime,
}
