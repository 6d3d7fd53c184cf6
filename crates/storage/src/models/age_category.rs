use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, sqlite::SqliteRow};
use utoipa::ToSchema;

use super::CategoryGender;

/// A named, gender-scoped, inclusive age bracket.
///
/// Ages are compared against the athlete's age as of January 1st of the
/// reference year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AgeCategory {
    pub name: String,
    pub min_age: i32,
    pub max_age: i32,
    pub gender: CategoryGender,
}

impl AgeCategory {
    pub fn new(
        name: impl Into<String>,
        min_age: i32,
        max_age: i32,
        gender: CategoryGender,
    ) -> Self {
        Self {
            name: name.into(),
            min_age,
            max_age,
            gender,
        }
    }

    pub fn covers_age(&self, age: i32) -> bool {
        self.min_age <= age && age <= self.max_age
    }

    /// True when both categories apply to the same gender scope and their
    /// age ranges share at least one year.
    pub fn overlaps(&self, other: &AgeCategory) -> bool {
        self.gender == other.gender
            && self.min_age <= other.max_age
            && other.min_age <= self.max_age
    }
}

impl<'r> FromRow<'r, SqliteRow> for AgeCategory {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let gender: String = row.try_get("gender")?;
        let gender = gender
            .parse::<CategoryGender>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "gender".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            name: row.try_get("name")?,
            min_age: row.try_get("min_age")?,
            max_age: row.try_get("max_age")?,
            gender,
        })
    }
}
