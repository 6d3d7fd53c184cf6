pub mod athletes;
pub mod classification;
pub mod clubs;
pub mod rulesets;
pub mod tournaments;
