use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    activate_ruleset, create_ruleset, delete_ruleset, get_active_ruleset, get_ruleset,
    list_rulesets,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_ruleset))
        .route("/:id/activate", put(activate_ruleset))
        .route("/:id", delete(delete_ruleset))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_rulesets))
        .route("/active", get(get_active_ruleset))
        .route("/:id", get(get_ruleset))
        .merge(protected)
}
