use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::AgeCategory;

/// Anything that carries an ordered list of age categories to classify
/// against: a live ruleset or a tournament's frozen snapshot.
pub trait CategorySource {
    fn categories(&self) -> &[AgeCategory];
}

impl CategorySource for [AgeCategory] {
    fn categories(&self) -> &[AgeCategory] {
        self
    }
}

impl CategorySource for Vec<AgeCategory> {
    fn categories(&self) -> &[AgeCategory] {
        self
    }
}

/// Header row of the `rulesets` table.
#[derive(Debug, Clone, FromRow)]
pub struct RulesetRow {
    pub ruleset_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// A named collection of age categories. At most one ruleset is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ruleset {
    pub ruleset_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub categories: Vec<AgeCategory>,
    pub created_at: NaiveDateTime,
}

impl Ruleset {
    pub fn from_row(row: RulesetRow, categories: Vec<AgeCategory>) -> Self {
        Self {
            ruleset_id: row.ruleset_id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            categories,
            created_at: row.created_at,
        }
    }
}

impl CategorySource for Ruleset {
    fn categories(&self) -> &[AgeCategory] {
        &self.categories
    }
}
