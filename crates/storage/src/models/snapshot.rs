use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AgeCategory, CategorySource, WeightClass};

/// Frozen copy of a ruleset's categories plus the tournament's own weight
/// classes, keyed by category name.
///
/// Captured once at tournament creation and stored as JSON, so later edits
/// to the live ruleset never reach past tournaments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RulesetSnapshot {
    pub ruleset_id: Uuid,
    pub ruleset_name: String,
    pub categories: Vec<AgeCategory>,
    #[serde(default)]
    pub weight_classes: BTreeMap<String, Vec<WeightClass>>,
    pub captured_at: NaiveDateTime,
}

impl RulesetSnapshot {
    /// Weight classes configured for a category, sorted by ascending limit.
    pub fn weight_classes_for(&self, category: &str) -> Vec<&WeightClass> {
        let mut classes: Vec<&WeightClass> = self
            .weight_classes
            .get(category)
            .map(|classes| classes.iter().collect())
            .unwrap_or_default();
        classes.sort_by_key(|c| (c.limit, c.is_open()));
        classes
    }

    /// Position of a category in the snapshot, used for display ordering.
    pub fn category_position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }
}

impl CategorySource for RulesetSnapshot {
    fn categories(&self) -> &[AgeCategory] {
        &self.categories
    }
}
