use super::models::{CanonicalFormat, FORMAT_VERSION};
use crate::{ImporterError, Result};
use rust_decimal::Decimal;
use std::collections::HashSet;
use storage::models::{Gender, NormalizedAthleteName};
use storage::services::{check_categories, classification::birth_year};
use tracing::warn;

pub struct CanonicalValidator;

impl CanonicalValidator {
    /// Full report; fails with [`ImporterError::ValidationError`] when any
    /// error was found.
    pub fn validate(canonical: &CanonicalFormat) -> Result<ValidationReport> {
        let report = Self::report(canonical);

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    pub fn report(canonical: &CanonicalFormat) -> ValidationReport {
        let mut report = ValidationReport::default();

        if canonical.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                canonical.format_version, FORMAT_VERSION
            ));
        }

        if canonical.rulesets.is_empty() && canonical.clubs.is_empty() && canonical.athletes.is_empty()
        {
            report.warnings.push("File contains nothing to import".to_string());
        }

        Self::check_rulesets(canonical, &mut report);
        let club_names = Self::check_clubs(canonical, &mut report);
        Self::check_athletes(canonical, &club_names, &mut report);

        report
    }

    fn check_rulesets(canonical: &CanonicalFormat, report: &mut ValidationReport) {
        let mut names = HashSet::new();

        for ruleset in &canonical.rulesets {
            if ruleset.name.trim().is_empty() {
                report.errors.push("Ruleset name cannot be empty".to_string());
            }
            if !names.insert(ruleset.name.as_str()) {
                report
                    .errors
                    .push(format!("Duplicate ruleset name: '{}'", ruleset.name));
            }
            if ruleset.categories.is_empty() {
                report
                    .errors
                    .push(format!("Ruleset '{}' has no categories", ruleset.name));
            }

            let check = check_categories(&ruleset.categories);
            report.errors.extend(
                check
                    .errors
                    .into_iter()
                    .map(|e| format!("Ruleset '{}': {}", ruleset.name, e)),
            );
            report.warnings.extend(
                check
                    .warnings
                    .into_iter()
                    .map(|w| format!("Ruleset '{}': {}", ruleset.name, w)),
            );
        }

        let flagged = canonical.rulesets.iter().filter(|r| r.activate).count();
        if flagged > 1 {
            if let Some(active) = canonical.active_ruleset() {
                report.warnings.push(format!(
                    "{} rulesets are flagged active; only '{}' will be",
                    flagged, active.name
                ));
            }
        }
    }

    fn check_clubs<'c>(canonical: &'c CanonicalFormat, report: &mut ValidationReport) -> HashSet<&'c str> {
        let mut names = HashSet::new();

        for club in &canonical.clubs {
            if club.name.trim().is_empty() {
                report.errors.push("Club name cannot be empty".to_string());
            } else if !names.insert(club.name.as_str()) {
                report
                    .errors
                    .push(format!("Duplicate club name: '{}'", club.name));
            }
        }

        names
    }

    fn check_athletes(
        canonical: &CanonicalFormat,
        club_names: &HashSet<&str>,
        report: &mut ValidationReport,
    ) {
        let mut licenses = HashSet::new();
        let mut people = HashSet::new();

        for (idx, athlete) in canonical.athletes.iter().enumerate() {
            let athlete_label = format!("{}. {}", idx + 1, athlete.label());

            if athlete.first_name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Athlete #{} has empty first_name", idx + 1));
            }
            if athlete.last_name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Athlete #{} has empty last_name", idx + 1));
            }
            if athlete.gender.parse::<Gender>().is_err() {
                report.errors.push(format!(
                    "Athlete '{}' has invalid gender '{}'",
                    athlete_label, athlete.gender
                ));
            }

            match athlete.birth_date.as_deref() {
                None => report
                    .warnings
                    .push(format!("Athlete '{}' is missing birth_date", athlete_label)),
                Some(date) if birth_year(date).is_none() => report.errors.push(format!(
                    "Athlete '{}' has unreadable birth_date '{}'",
                    athlete_label, date
                )),
                Some(_) => {}
            }

            match athlete.weight {
                None => report
                    .warnings
                    .push(format!("Athlete '{}' is missing weight", athlete_label)),
                Some(weight) if weight.is_sign_negative() || weight > Decimal::from(400) => {
                    report.errors.push(format!(
                        "Athlete '{}' has out of range weight {}",
                        athlete_label, weight
                    ))
                }
                Some(_) => {}
            }

            if let Some(club) = athlete.club.as_deref() {
                if !club_names.contains(club) {
                    report.warnings.push(format!(
                        "Athlete '{}' references club '{}' not declared in this file",
                        athlete_label, club
                    ));
                }
            }

            if let Some(license) = athlete.license_number.as_deref() {
                if !licenses.insert(license) {
                    report.errors.push(format!(
                        "Duplicate license number '{}' (athlete '{}')",
                        license, athlete_label
                    ));
                }
            }

            let key = (
                NormalizedAthleteName::new(&athlete.first_name, &athlete.last_name).key(),
                athlete.birth_date.as_deref(),
            );
            if !people.insert(key) {
                report.warnings.push(format!(
                    "Athlete '{}' appears more than once; later entries are skipped",
                    athlete_label
                ));
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
