use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, sqlite::SqliteRow};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Athlete {
    pub athlete_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Free-form date text; only the leading `YYYY` matters for classification.
    pub birth_date: Option<String>,
    pub gender: Gender,
    /// Body weight in kg, `0` when unknown.
    pub weight: Decimal,
    pub rank: Option<String>,
    pub club_id: Option<Uuid>,
    pub nationality: Option<String>,
    pub license_number: Option<String>,
    pub created_at: NaiveDateTime,
}

fn decode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

// Weights live in a TEXT column so the decimal survives unchanged.
impl<'r> FromRow<'r, SqliteRow> for Athlete {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let gender: String = row.try_get("gender")?;
        let weight: String = row.try_get("weight")?;

        Ok(Self {
            athlete_id: row.try_get("athlete_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            birth_date: row.try_get("birth_date")?,
            gender: Gender::from_str(&gender).map_err(|e| decode_error("gender", e))?,
            weight: Decimal::from_str(&weight).map_err(|e| decode_error("weight", e))?,
            rank: row.try_get("rank")?,
            club_id: row.try_get("club_id")?,
            nationality: row.try_get("nationality")?,
            license_number: row.try_get("license_number")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
