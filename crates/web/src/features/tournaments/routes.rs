use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{
    add_roster_entry, create_tournament, delete_tournament, get_roster, get_tournament,
    list_tournaments, remove_roster_entry,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_tournament))
        .route("/:id", delete(delete_tournament))
        .route("/:id/roster", post(add_roster_entry))
        .route("/:id/roster/:athlete_id", delete(remove_roster_entry))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_tournaments))
        .route("/:id", get(get_tournament))
        .route("/:id/roster", get(get_roster))
        .merge(protected)
}
