use super::models::CanonicalFormat;
use crate::{ImporterError, Result};
use rust_decimal::Decimal;
use storage::models::Gender;
use storage::services::{
    AthleteSnapshot, EligibilityConflict, bucket_weight_class, resolve_age_category,
    validate_eligibility,
};
use uuid::Uuid;

/// Classification of one athlete from a file, before anything is stored.
#[derive(Debug, Clone)]
pub struct AthleteCheck {
    pub athlete: String,
    pub age_category: String,
    pub weight_division: String,
    pub conflicts: Vec<EligibilityConflict>,
}

/// Checks every athlete in the file against the file's active ruleset.
/// Athletes get a provisional id so their conflicts are reported.
pub fn check_file(canonical: &CanonicalFormat, reference_year: i32) -> Result<Vec<AthleteCheck>> {
    let ruleset = canonical.active_ruleset().ok_or_else(|| {
        ImporterError::ValidationError("File has no ruleset flagged active".to_string())
    })?;

    canonical
        .athletes
        .iter()
        .map(|athlete| {
            let gender: Gender = athlete.gender.parse().map_err(|e| {
                ImporterError::ValidationError(format!("Athlete '{}': {}", athlete.label(), e))
            })?;
            let snapshot = AthleteSnapshot {
                athlete_id: Some(Uuid::new_v4()),
                birth_date: athlete.birth_date.clone(),
                gender,
                weight: athlete.weight.unwrap_or(Decimal::ZERO),
            };

            Ok(AthleteCheck {
                athlete: athlete.label(),
                age_category: resolve_age_category(
                    snapshot.birth_date.as_deref(),
                    gender,
                    &ruleset.categories,
                    reference_year,
                ),
                weight_division: bucket_weight_class(gender, snapshot.weight).to_string(),
                conflicts: validate_eligibility(&snapshot, &ruleset.categories, reference_year),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::models::{AthleteData, RulesetData, SourceMetadata, SourceType};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use storage::models::{AgeCategory, CategoryGender};
    use storage::services::{ConflictType, UNCLASSIFIED};

    fn athlete(first: &str, birth_date: &str, weight: Option<Decimal>) -> AthleteData {
        AthleteData {
            first_name: first.to_string(),
            last_name: "Test".to_string(),
            birth_date: Some(birth_date.to_string()),
            gender: "F".to_string(),
            weight,
            rank: None,
            club: None,
            nationality: None,
            license_number: None,
        }
    }

    fn file(activate: bool) -> CanonicalFormat {
        CanonicalFormat {
            format_version: "1.0.0".to_string(),
            source: SourceMetadata {
                r#type: SourceType::Csv,
                url: None,
                extracted_at: Utc::now(),
                extractor: "test".to_string(),
                original_filename: None,
            },
            rulesets: vec![RulesetData {
                name: "2025".to_string(),
                description: None,
                activate,
                categories: vec![
                    AgeCategory::new("Cadets (F)", 15, 17, CategoryGender::F),
                    AgeCategory::new("Seniors", 21, 125, CategoryGender::Mixed),
                ],
            }],
            clubs: Vec::new(),
            athletes: vec![
                athlete("Mia", "2009-02-14", Some(dec!(51))),
                athlete("Zoe", "2006-08-01", None),
            ],
        }
    }

    #[test]
    fn test_check_file_classifies_and_reports() {
        let checks = check_file(&file(true), 2025).unwrap();

        assert_eq!(checks[0].age_category, "Cadets (F)");
        assert_eq!(checks[0].weight_division, "-52kg");
        assert!(checks[0].conflicts.is_empty());

        assert_eq!(checks[1].age_category, UNCLASSIFIED);
        assert_eq!(checks[1].weight_division, UNCLASSIFIED);
        assert_eq!(checks[1].conflicts.len(), 1);
        assert_eq!(checks[1].conflicts[0].conflict_type, ConflictType::Age);
    }

    #[test]
    fn test_check_file_needs_active_ruleset() {
        assert!(matches!(
            check_file(&file(false), 2025),
            Err(ImporterError::ValidationError(_))
        ));
    }
}
