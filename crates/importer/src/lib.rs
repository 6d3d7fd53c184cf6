pub mod canonical;
pub mod error;

pub use canonical::{
    checker::{AthleteCheck, check_file},
    models::CanonicalFormat,
    transformer::{CanonicalTransformer, ImportSummary},
    validator::{CanonicalValidator, ValidationReport},
};
pub use error::{ImporterError, Result};
