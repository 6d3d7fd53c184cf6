use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::classification::{UNCLASSIFIED, resolve_age_category};
use super::eligibility::{AthleteSnapshot, EligibilityConflict, over_limit, validate_eligibility};
use super::weight_class::{Division, bucket_weight_class, parse_division};
use crate::models::{RosteredAthlete, RulesetSnapshot};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterAthlete {
    pub athlete_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub club_id: Option<Uuid>,
    pub rank: Option<String>,
    pub weight: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterGroup {
    pub category: String,
    pub weight_class: String,
    pub athletes: Vec<RosterAthlete>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterReport {
    pub reference_year: i32,
    pub total_athletes: usize,
    pub groups: Vec<RosterGroup>,
    pub conflicts: Vec<EligibilityConflict>,
}

impl RosterReport {
    pub fn has_errors(&self) -> bool {
        self.conflicts.iter().any(EligibilityConflict::is_error)
    }
}

struct Placement {
    label: String,
    limit: Option<Decimal>,
}

/// Picks the weight class an entry competes in: the explicit assignment,
/// else the lightest tournament class that admits the athlete, else the
/// standard division table.
fn place(entry: &RosteredAthlete, category: &str, snapshot: &RulesetSnapshot) -> Placement {
    let athlete = &entry.athlete;
    let classes = snapshot.weight_classes_for(category);

    if let Some(label) = &entry.weight_class {
        let limit = classes
            .iter()
            .find(|c| &c.label == label)
            .map(|c| c.ceiling())
            .unwrap_or_else(|| match parse_division(label) {
                Some(Division::UpTo(limit)) => Some(limit),
                _ => None,
            });
        return Placement {
            label: label.clone(),
            limit,
        };
    }

    if classes.is_empty() {
        return Placement {
            label: bucket_weight_class(athlete.gender, athlete.weight).to_string(),
            limit: None,
        };
    }

    if athlete.weight <= Decimal::ZERO {
        return Placement {
            label: UNCLASSIFIED.to_string(),
            limit: None,
        };
    }

    // Heavier than every class: park in the heaviest and let the limit
    // check report it.
    let class = classes
        .iter()
        .find(|c| c.admits(athlete.weight))
        .or(classes.last())
        .copied();

    match class {
        Some(class) => Placement {
            label: class.label.clone(),
            limit: class.ceiling(),
        },
        None => Placement {
            label: UNCLASSIFIED.to_string(),
            limit: None,
        },
    }
}

/// Sort key for weight classes: bounded classes by limit, open classes
/// after them, unclassified last.
fn weight_order(placement: &Placement) -> (u8, Decimal) {
    if let Some(limit) = placement.limit {
        return (0, limit);
    }
    match parse_division(&placement.label) {
        Some(Division::UpTo(limit)) => (0, limit),
        Some(Division::Over(floor)) => (1, floor),
        None => (2, Decimal::ZERO),
    }
}

/// Groups a tournament roster by age category and weight class and
/// collects every athlete's conflicts against the frozen snapshot.
pub fn aggregate_roster(
    entries: &[RosteredAthlete],
    snapshot: &RulesetSnapshot,
    reference_year: i32,
) -> RosterReport {
    type GroupKey = (usize, (u8, Decimal), String, String);
    let mut groups: BTreeMap<GroupKey, Vec<RosterAthlete>> = BTreeMap::new();
    let mut conflicts = Vec::new();

    for entry in entries {
        let athlete = &entry.athlete;
        let category = resolve_age_category(
            athlete.birth_date.as_deref(),
            athlete.gender,
            &snapshot.categories,
            reference_year,
        );
        let placement = place(entry, &category, snapshot);

        conflicts.extend(validate_eligibility(
            &AthleteSnapshot::from(athlete),
            snapshot,
            reference_year,
        ));
        if let Some(limit) = placement.limit {
            if athlete.weight > Decimal::ZERO && athlete.weight > limit {
                conflicts.push(over_limit(
                    athlete.athlete_id,
                    &placement.label,
                    athlete.weight,
                    limit,
                ));
            }
        }

        let position = snapshot
            .category_position(&category)
            .unwrap_or(usize::MAX);
        let key = (
            position,
            weight_order(&placement),
            category,
            placement.label,
        );
        groups.entry(key).or_default().push(RosterAthlete {
            athlete_id: athlete.athlete_id,
            first_name: athlete.first_name.clone(),
            last_name: athlete.last_name.clone(),
            club_id: athlete.club_id,
            rank: athlete.rank.clone(),
            weight: athlete.weight,
        });
    }

    let groups = groups
        .into_iter()
        .map(|((_, _, category, weight_class), mut athletes)| {
            athletes.sort_by_key(|a| (a.last_name.to_lowercase(), a.first_name.to_lowercase()));
            RosterGroup {
                category,
                weight_class,
                athletes,
            }
        })
        .collect();

    RosterReport {
        reference_year,
        total_athletes: entries.len(),
        groups,
        conflicts,
    }
}
