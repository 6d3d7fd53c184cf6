pub mod athlete;
pub mod classification;
pub mod club;
pub mod common;
pub mod ruleset;
pub mod tournament;
