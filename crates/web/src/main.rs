use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;

use config::Config;
use features::{athletes, classification, clubs, rulesets, tournaments};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        classification::handlers::resolve_age_category,
        classification::handlers::bucket_weight,
        classification::handlers::list_weight_divisions,
        classification::handlers::check_eligibility,
        rulesets::handlers::list_rulesets,
        rulesets::handlers::get_active_ruleset,
        rulesets::handlers::get_ruleset,
        rulesets::handlers::create_ruleset,
        rulesets::handlers::activate_ruleset,
        rulesets::handlers::delete_ruleset,
        athletes::handlers::list_athletes,
        athletes::handlers::get_athlete,
        athletes::handlers::get_athlete_eligibility,
        athletes::handlers::create_athlete,
        athletes::handlers::update_athlete,
        athletes::handlers::delete_athlete,
        clubs::handlers::list_clubs,
        clubs::handlers::get_club,
        clubs::handlers::list_club_athletes,
        clubs::handlers::create_club,
        clubs::handlers::delete_club,
        tournaments::handlers::list_tournaments,
        tournaments::handlers::get_tournament,
        tournaments::handlers::create_tournament,
        tournaments::handlers::delete_tournament,
        tournaments::handlers::get_roster,
        tournaments::handlers::add_roster_entry,
        tournaments::handlers::remove_roster_entry,
    ),
    components(
        schemas(
            storage::dto::classification::ResolveAgeCategoryRequest,
            storage::dto::classification::ResolveAgeCategoryResponse,
            storage::dto::classification::BucketWeightRequest,
            storage::dto::classification::BucketWeightResponse,
            storage::dto::classification::WeightDivisionsResponse,
            storage::dto::classification::EligibilityRequest,
            storage::dto::classification::EligibilityResponse,
            storage::dto::ruleset::CreateRulesetRequest,
            storage::dto::ruleset::AgeCategoryRequest,
            storage::dto::athlete::CreateAthleteRequest,
            storage::dto::athlete::UpdateAthleteRequest,
            storage::dto::athlete::AthleteResponse,
            storage::dto::club::CreateClubRequest,
            storage::dto::tournament::CreateTournamentRequest,
            storage::dto::tournament::AddRosterEntryRequest,
            storage::dto::tournament::TournamentResponse,
            storage::dto::common::PaginationMeta,
            storage::models::Ruleset,
            storage::models::AgeCategory,
            storage::models::CategoryGender,
            storage::models::Gender,
            storage::models::Club,
            storage::models::WeightClass,
            storage::models::RulesetSnapshot,
            storage::models::RosterEntry,
            storage::services::AthleteSnapshot,
            storage::services::EligibilityConflict,
            storage::services::ConflictType,
            storage::services::Severity,
            storage::services::RosterReport,
            storage::services::roster::RosterGroup,
            storage::services::roster::RosterAthlete,
        )
    ),
    tags(
        (name = "classification", description = "Age category, weight class and eligibility computations"),
        (name = "rulesets", description = "Age category rulesets"),
        (name = "athletes", description = "Athlete records"),
        (name = "clubs", description = "Clubs"),
        (name = "tournaments", description = "Tournaments and rosters"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Tatami API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!("Opening database at: {}", config.database_url);
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, every mutating route will answer 401");
    }

    let app: Router = routes::api_routes(api_keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db);

    let bind_address = config.bind_address();
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
