use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::classification::{UNCLASSIFIED, age_in, resolve_age_category};
use super::weight_class::{Division, bucket_weight_class, parse_division};
use crate::models::{Athlete, CategorySource, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    Age,
    Weight,
    /// Reserved for grade-based rules; nothing produces it yet.
    Rank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A finding that an athlete does not cleanly fit a ruleset. Computed on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EligibilityConflict {
    pub athlete_id: Uuid,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl EligibilityConflict {
    pub fn error(
        athlete_id: Uuid,
        conflict_type: ConflictType,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            athlete_id,
            conflict_type,
            severity: Severity::Error,
            message: message.into(),
            details,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The slice of an athlete that classification reads. `athlete_id` is
/// `None` for athletes that have not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AthleteSnapshot {
    pub athlete_id: Option<Uuid>,
    pub birth_date: Option<String>,
    pub gender: Gender,
    pub weight: Decimal,
}

impl From<&Athlete> for AthleteSnapshot {
    fn from(athlete: &Athlete) -> Self {
        Self {
            athlete_id: Some(athlete.athlete_id),
            birth_date: athlete.birth_date.clone(),
            gender: athlete.gender,
            weight: athlete.weight,
        }
    }
}

/// Checks an athlete against a ruleset's age categories and the standard
/// weight divisions.
///
/// Unsaved athletes yield no conflicts. Age conflicts come before weight
/// conflicts. A weight of zero or less means "not weighed" and is skipped.
pub fn validate_eligibility<S>(
    athlete: &AthleteSnapshot,
    ruleset: &S,
    reference_year: i32,
) -> Vec<EligibilityConflict>
where
    S: CategorySource + ?Sized,
{
    let Some(athlete_id) = athlete.athlete_id else {
        return Vec::new();
    };

    let mut conflicts = Vec::new();

    let category = resolve_age_category(
        athlete.birth_date.as_deref(),
        athlete.gender,
        ruleset.categories(),
        reference_year,
    );
    if category == UNCLASSIFIED {
        let details = match age_in(athlete.birth_date.as_deref(), reference_year) {
            Some(age) => format!(
                "Age {} in {} is outside every {} category",
                age, reference_year, athlete.gender
            ),
            None => "Birth date is missing or unreadable".to_string(),
        };
        conflicts.push(EligibilityConflict::error(
            athlete_id,
            ConflictType::Age,
            "No age category matches this athlete",
            Some(details),
        ));
    }

    if athlete.weight > Decimal::ZERO {
        conflicts.extend(check_weight(athlete_id, athlete.gender, athlete.weight));
    }

    tracing::debug!(
        %athlete_id,
        reference_year,
        conflicts = conflicts.len(),
        "eligibility evaluated"
    );

    conflicts
}

fn check_weight(athlete_id: Uuid, gender: Gender, weight: Decimal) -> Option<EligibilityConflict> {
    let label = bucket_weight_class(gender, weight);
    if label == UNCLASSIFIED {
        return Some(EligibilityConflict::error(
            athlete_id,
            ConflictType::Weight,
            "No weight class matches this athlete",
            Some(format!("{}kg does not fit any {} division", weight.normalize(), gender)),
        ));
    }

    // Re-derive the limit from the label: a mismatch means the division
    // table and its parser disagree.
    match parse_division(label) {
        Some(Division::UpTo(limit)) if weight > limit => Some(over_limit(athlete_id, label, weight, limit)),
        _ => None,
    }
}

/// Conflict for an athlete heavier than the class they were placed in.
pub fn over_limit(
    athlete_id: Uuid,
    label: &str,
    weight: Decimal,
    limit: Decimal,
) -> EligibilityConflict {
    EligibilityConflict::error(
        athlete_id,
        ConflictType::Weight,
        format!("Weight exceeds the {} limit", label),
        Some(format!(
            "{}kg is {}kg over the {}kg limit",
            weight.normalize(),
            (weight - limit).normalize(),
            limit.normalize()
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeCategory, CategoryGender};
    use rust_decimal_macros::dec;

    fn categories() -> Vec<AgeCategory> {
        vec![
            AgeCategory::new("U-18 Cadets (M)", 15, 17, CategoryGender::M),
            AgeCategory::new("U-21 Juniors (M)", 18, 20, CategoryGender::M),
            AgeCategory::new("Seniors (M)", 21, 125, CategoryGender::M),
            AgeCategory::new("Seniors (F)", 21, 125, CategoryGender::F),
        ]
    }

    fn athlete(birth_date: Option<&str>, gender: Gender, weight: Decimal) -> AthleteSnapshot {
        AthleteSnapshot {
            athlete_id: Some(Uuid::new_v4()),
            birth_date: birth_date.map(String::from),
            gender,
            weight,
        }
    }

    #[test]
    fn test_unsaved_athlete_has_no_conflicts() {
        let mut unsaved = athlete(None, Gender::Male, dec!(-5));
        unsaved.athlete_id = None;
        assert!(validate_eligibility(&unsaved, &categories(), 2025).is_empty());
    }

    #[test]
    fn test_eligible_athlete_has_no_conflicts() {
        let a = athlete(Some("1995-02-02"), Gender::Male, dec!(72.4));
        assert!(validate_eligibility(&a, &categories(), 2025).is_empty());
    }

    #[test]
    fn test_unmatched_age_yields_single_age_error() {
        let a = athlete(Some("2015-02-02"), Gender::Male, dec!(0));
        let conflicts = validate_eligibility(&a, &categories(), 2025);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Age);
        assert_eq!(conflicts[0].severity, Severity::Error);
        assert_eq!(conflicts[0].athlete_id, a.athlete_id.unwrap());
        assert!(conflicts[0].details.as_deref().unwrap().contains("Age 10"));
    }

    #[test]
    fn test_missing_birth_date_details() {
        let a = athlete(None, Gender::Female, dec!(0));
        let conflicts = validate_eligibility(&a, &categories(), 2025);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts[0].details.as_deref(),
            Some("Birth date is missing or unreadable")
        );
    }

    #[test]
    fn test_unrepresentable_age_reads_as_unreadable_birth_date() {
        let a = athlete(Some("2000-01-01"), Gender::Male, dec!(70));
        let conflicts = validate_eligibility(&a, &categories(), i32::MIN);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Age);
        assert_eq!(
            conflicts[0].details.as_deref(),
            Some("Birth date is missing or unreadable")
        );
    }

    #[test]
    fn test_non_positive_weight_never_flags_weight() {
        for weight in [dec!(0), dec!(-1)] {
            for ruleset in [categories(), Vec::new()] {
                let a = athlete(Some("1990-01-01"), Gender::Female, weight);
                let conflicts = validate_eligibility(&a, &ruleset, 2025);
                assert!(
                    conflicts
                        .iter()
                        .all(|c| c.conflict_type != ConflictType::Weight)
                );
            }
        }
    }

    #[test]
    fn test_heavy_athlete_is_never_over_an_open_class() {
        let a = athlete(Some("1990-01-01"), Gender::Male, dec!(142));
        assert!(validate_eligibility(&a, &categories(), 2025).is_empty());
    }

    #[test]
    fn test_age_conflict_precedes_others() {
        let a = athlete(Some("bad"), Gender::Male, dec!(80));
        let conflicts = validate_eligibility(&a, &[] as &[AgeCategory], 2025);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Age);
    }

    #[test]
    fn test_over_limit_reports_overage() {
        let conflict = over_limit(Uuid::nil(), "-66kg", dec!(68.5), dec!(66));
        assert_eq!(conflict.conflict_type, ConflictType::Weight);
        assert_eq!(conflict.message, "Weight exceeds the -66kg limit");
        assert_eq!(
            conflict.details.as_deref(),
            Some("68.5kg is 2.5kg over the 66kg limit")
        );
    }

    #[test]
    fn test_conflict_serializes_with_type_key() {
        let conflict = EligibilityConflict::error(Uuid::nil(), ConflictType::Age, "x", None);
        let json = serde_json::to_value(&conflict).unwrap();
        assert_eq!(json["type"], "age");
        assert_eq!(json["severity"], "error");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let a = athlete(Some("2012-01-01"), Gender::Male, dec!(40));
        let first = serde_json::to_string(&validate_eligibility(&a, &categories(), 2025)).unwrap();
        let second = serde_json::to_string(&validate_eligibility(&a, &categories(), 2025)).unwrap();
        assert_eq!(first, second);
    }
}
