mod age_category;
mod athlete;
mod club;
mod gender;
mod normalized_name;
mod roster_entry;
mod ruleset;
mod snapshot;
mod tournament;
mod weight_class;

pub use age_category::AgeCategory;
pub use athlete::Athlete;
pub use club::Club;
pub use gender::{CategoryGender, Gender, UnknownGender};
pub use normalized_name::NormalizedAthleteName;
pub use roster_entry::{RosterEntry, RosteredAthlete};
pub use ruleset::{CategorySource, Ruleset, RulesetRow};
pub use snapshot::RulesetSnapshot;
pub use tournament::Tournament;
pub use weight_class::WeightClass;
