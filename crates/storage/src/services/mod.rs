pub mod classification;
pub mod eligibility;
pub mod roster;
pub mod ruleset_catalog;
pub mod weight_class;

pub use classification::{UNCLASSIFIED, resolve_age_category};
pub use eligibility::{
    AthleteSnapshot, ConflictType, EligibilityConflict, Severity, validate_eligibility,
};
pub use roster::{RosterReport, aggregate_roster};
pub use ruleset_catalog::{CatalogError, CategoryCheck, RulesetCatalog, check_categories};
pub use weight_class::{bucket_weight_class, weight_divisions};
