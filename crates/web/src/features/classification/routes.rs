use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{bucket_weight, check_eligibility, list_weight_divisions, resolve_age_category};

// Read-only computations, no API key required.
pub fn routes() -> Router<Database> {
    Router::new()
        .route("/age-category", post(resolve_age_category))
        .route("/weight-class", post(bucket_weight))
        .route("/weight-divisions/:gender", get(list_weight_divisions))
        .route("/eligibility", post(check_eligibility))
}
