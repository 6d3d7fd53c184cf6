use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AgeCategory, Ruleset, RulesetSnapshot, WeightClass};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown ruleset: {0}")]
    UnknownRuleset(Uuid),
}

/// In-memory set of rulesets that keeps at most one of them active.
///
/// Activation goes through [`RulesetCatalog::set_active`], which flips every
/// flag in one pass, so callers cannot leave two rulesets active.
#[derive(Debug, Clone, Default)]
pub struct RulesetCatalog {
    rulesets: Vec<Ruleset>,
}

impl RulesetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from stored rulesets. If the input claims several
    /// active rulesets, only the first keeps its flag.
    pub fn from_rulesets(rulesets: impl IntoIterator<Item = Ruleset>) -> Self {
        let mut catalog = Self::new();
        let mut seen_active = false;
        for mut ruleset in rulesets {
            if ruleset.is_active && seen_active {
                tracing::warn!(
                    ruleset_id = %ruleset.ruleset_id,
                    "Multiple active rulesets found, deactivating"
                );
                ruleset.is_active = false;
            }
            seen_active |= ruleset.is_active;
            catalog.rulesets.push(ruleset);
        }
        catalog
    }

    /// Adds or replaces a ruleset. An active ruleset deactivates the others.
    pub fn insert(&mut self, ruleset: Ruleset) {
        let id = ruleset.ruleset_id;
        let activate = ruleset.is_active;

        match self.rulesets.iter_mut().find(|r| r.ruleset_id == id) {
            Some(existing) => *existing = ruleset,
            None => self.rulesets.push(ruleset),
        }

        if activate {
            self.flip_active(id);
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Ruleset> {
        self.rulesets.iter().find(|r| r.ruleset_id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Ruleset> {
        self.rulesets.iter_mut().find(|r| r.ruleset_id == id)
    }

    pub fn active(&self) -> Option<&Ruleset> {
        self.rulesets.iter().find(|r| r.is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ruleset> {
        self.rulesets.iter()
    }

    pub fn len(&self) -> usize {
        self.rulesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rulesets.is_empty()
    }

    /// Makes `id` the only active ruleset. Unknown ids leave the catalog
    /// untouched.
    pub fn set_active(&mut self, id: Uuid) -> Result<(), CatalogError> {
        if self.get(id).is_none() {
            return Err(CatalogError::UnknownRuleset(id));
        }
        self.flip_active(id);
        Ok(())
    }

    fn flip_active(&mut self, id: Uuid) {
        for ruleset in &mut self.rulesets {
            ruleset.is_active = ruleset.ruleset_id == id;
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Ruleset> {
        let index = self.rulesets.iter().position(|r| r.ruleset_id == id)?;
        Some(self.rulesets.remove(index))
    }

    /// Freezes a ruleset's categories together with tournament weight
    /// classes.
    pub fn snapshot(
        &self,
        id: Uuid,
        weight_classes: BTreeMap<String, Vec<WeightClass>>,
        captured_at: NaiveDateTime,
    ) -> Result<RulesetSnapshot, CatalogError> {
        let ruleset = self.get(id).ok_or(CatalogError::UnknownRuleset(id))?;
        Ok(snapshot_of(ruleset, weight_classes, captured_at))
    }
}

pub fn snapshot_of(
    ruleset: &Ruleset,
    weight_classes: BTreeMap<String, Vec<WeightClass>>,
    captured_at: NaiveDateTime,
) -> RulesetSnapshot {
    RulesetSnapshot {
        ruleset_id: ruleset.ruleset_id,
        ruleset_name: ruleset.name.clone(),
        categories: ruleset.categories.clone(),
        weight_classes,
        captured_at,
    }
}

/// Consistency findings for a category list. Errors make the list unusable;
/// warnings flag ambiguity the resolver tolerates (first match wins).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn check_categories(categories: &[AgeCategory]) -> CategoryCheck {
    let mut check = CategoryCheck::default();
    let mut names = HashSet::new();

    for (idx, category) in categories.iter().enumerate() {
        if category.name.trim().is_empty() {
            check
                .errors
                .push(format!("Category #{} has an empty name", idx + 1));
        }
        if !names.insert(category.name.as_str()) {
            check
                .errors
                .push(format!("Duplicate category name: '{}'", category.name));
        }
        if category.min_age > category.max_age {
            check.errors.push(format!(
                "Category '{}' has min_age {} above max_age {}",
                category.name, category.min_age, category.max_age
            ));
        }

        for earlier in &categories[..idx] {
            if earlier.overlaps(category) {
                check.warnings.push(format!(
                    "Category '{}' overlaps '{}'; '{}' wins for shared ages",
                    category.name, earlier.name, earlier.name
                ));
            }
        }
    }

    check
}
