use axum::Router;
use storage::Database;

use crate::features::{athletes, classification, clubs, rulesets, tournaments};
use crate::middleware::auth::ApiKeys;

/// Every `/api` route, still waiting for its database state.
pub fn api_routes(api_keys: ApiKeys) -> Router<Database> {
    let api = Router::new()
        .nest("/classification", classification::routes::routes())
        .nest("/rulesets", rulesets::routes::routes(api_keys.clone()))
        .nest("/athletes", athletes::routes::routes(api_keys.clone()))
        .nest("/clubs", clubs::routes::routes(api_keys.clone()))
        .nest("/tournaments", tournaments::routes::routes(api_keys));

    Router::new().nest("/api", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const KEY: &str = "test-key";

    async fn app() -> Router {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        api_routes(ApiKeys::from_comma_separated(KEY)).with_state(db)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>, auth: bool) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", KEY));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn ruleset_body(name: &str) -> Value {
        json!({
            "name": name,
            "activate": true,
            "categories": [
                { "name": "U-18 Cadets (M)", "min_age": 15, "max_age": 17, "gender": "M" },
                { "name": "U-21 Juniors (M)", "min_age": 18, "max_age": 20, "gender": "M" },
                { "name": "Seniors (M)", "min_age": 21, "max_age": 125, "gender": "M" }
            ]
        })
    }

    #[tokio::test]
    async fn test_mutations_require_api_key() {
        let app = app().await;

        let (status, _) = send(&app, "POST", "/api/rulesets", Some(ruleset_body("2025")), false).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "GET", "/api/rulesets", None, false).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_weight_endpoints() {
        let app = app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/classification/weight-class",
            Some(json!({ "gender": "male", "weight": "105" })),
            false,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weight_class"], "+100kg");

        let (status, body) = send(&app, "GET", "/api/classification/weight-divisions/female", None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["divisions"][0], "-48kg");

        let (status, _) = send(&app, "GET", "/api/classification/weight-divisions/other", None, false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_age_category_needs_active_ruleset() {
        let app = app().await;
        let request = json!({ "birth_date": "2008-05-01", "gender": "male", "reference_year": 2026 });

        let (status, _) = send(&app, "POST", "/api/classification/age-category", Some(request.clone()), false).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "POST", "/api/rulesets", Some(ruleset_body("2025")), true).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", "/api/classification/age-category", Some(request), false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "U-21 Juniors (M)");
        assert_eq!(body["age"], 18);
    }

    #[tokio::test]
    async fn test_tournament_roster_flow() {
        let app = app().await;
        send(&app, "POST", "/api/rulesets", Some(ruleset_body("2025")), true).await;

        let (status, tournament) = send(
            &app,
            "POST",
            "/api/tournaments",
            Some(json!({
                "name": "Spring Open",
                "event_date": "2025-04-12",
                "weight_classes": {
                    "Seniors (M)": [
                        { "limit": "73", "label": "-73kg" },
                        { "limit": "81", "label": "-81kg" }
                    ]
                }
            })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tournament["reference_year"], 2025);
        let tournament_id = tournament["tournament_id"].as_str().unwrap().to_string();

        let (status, athlete) = send(
            &app,
            "POST",
            "/api/athletes",
            Some(json!({
                "first_name": "Kenji",
                "last_name": "Sato",
                "birth_date": "1995-02-11",
                "gender": "male",
                "weight": "76.4"
            })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(athlete["weight_division"], "-81kg");
        let athlete_id = athlete["athlete_id"].as_str().unwrap().to_string();

        let roster_uri = format!("/api/tournaments/{}/roster", tournament_id);
        let entry = json!({ "athlete_id": athlete_id });
        let (status, _) = send(&app, "POST", &roster_uri, Some(entry.clone()), true).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, "POST", &roster_uri, Some(entry), true).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, report) = send(&app, "GET", &roster_uri, None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["total_athletes"], 1);
        assert_eq!(report["groups"][0]["category"], "Seniors (M)");
        assert_eq!(report["groups"][0]["weight_class"], "-81kg");
        assert_eq!(report["conflicts"], json!([]));
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_request() {
        let app = app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/athletes",
            Some(json!({
                "first_name": "",
                "last_name": "Sato",
                "gender": "male"
            })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
    }
}
