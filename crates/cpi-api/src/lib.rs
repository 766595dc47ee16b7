//! # cpi-api — Axum Service
//!
//! HTTP surface for the intake wizard: role-gated session creation,
//! field and row operations, navigation, and submission. Assembles one
//! router with request tracing; health probes are unauthenticated.
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers — everything delegates to
//!   `cpi-wizard` and `cpi-submit`.
//! - All errors map to structured JSON responses via [`AppError`].

pub mod error;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Assemble the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/live", get(health))
        .route("/health/ready", get(health))
        .route("/v1/profiles/sessions", post(routes::open_session))
        .route(
            "/v1/profiles/sessions/{id}",
            get(routes::get_session).delete(routes::close_session),
        )
        .route(
            "/v1/profiles/sessions/{id}/company-fields",
            post(routes::set_company_field),
        )
        .route(
            "/v1/profiles/sessions/{id}/list-fields",
            post(routes::set_list_field),
        )
        .route(
            "/v1/profiles/sessions/{id}/investor-fields",
            post(routes::set_investor_field),
        )
        .route("/v1/profiles/sessions/{id}/rows", post(routes::modify_rows))
        .route(
            "/v1/profiles/sessions/{id}/investors",
            post(routes::modify_investors),
        )
        .route("/v1/profiles/sessions/{id}/next", post(routes::next_step))
        .route(
            "/v1/profiles/sessions/{id}/previous",
            post(routes::previous_step),
        )
        .route("/v1/profiles/sessions/{id}/submit", post(routes::submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Serve the application on an already-bound listener.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: AppState,
) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    use cpi_submit::{MemoryAssetStore, MemoryProfileStore};

    fn app() -> (Router, Arc<MemoryProfileStore>) {
        let store = Arc::new(MemoryProfileStore::new());
        let assets = Arc::new(MemoryAssetStore::new());
        let state = AppState::new(store.clone(), assets);
        (router(state), store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn open_request(role: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/v1/profiles/sessions")
            .header("content-type", "application/json");
        if let Some(role) = role {
            builder = builder.header("x-intake-role", role);
        }
        builder
            .body(Body::from(json!({ "mode": "create" }).to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_probe() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_view_only_roles_are_refused() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(open_request(Some("PREMIUM")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.oneshot(open_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_session_walk_and_submit() {
        let (app, store) = app();

        let response = app
            .clone()
            .oneshot(open_request(Some("ADMIN")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let opened = body_json(response).await;
        let session_id = opened["session_id"].as_str().unwrap().to_string();
        assert_eq!(opened["step"], 1);

        // Required fields, then walk to the final step.
        for (field, value) in [("name", "Acme"), ("sector", "technology")] {
            let response = app
                .clone()
                .oneshot(post_json(
                    &format!("/v1/profiles/sessions/{session_id}/company-fields"),
                    json!({ "field": field, "value": { "kind": "text", "value": value } }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        for _ in 0..6 {
            let response = app
                .clone()
                .oneshot(post_empty(&format!(
                    "/v1/profiles/sessions/{session_id}/next"
                )))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["advanced"], true);
        }

        let response = app
            .clone()
            .oneshot(post_empty(&format!(
                "/v1/profiles/sessions/{session_id}/submit"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["phase"], "SUCCEEDED");

        let companies = store.companies();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Acme");
    }

    #[tokio::test]
    async fn test_validation_gate_reports_field_errors() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(open_request(Some("ENTERPRISE")))
            .await
            .unwrap();
        let opened = body_json(response).await;
        let session_id = opened["session_id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(post_empty(&format!(
                "/v1/profiles/sessions/{session_id}/next"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["advanced"], false);
        assert_eq!(body["step"], 1);
        assert!(body["field_errors"]["name"].is_string());
        assert!(body["field_errors"]["sector"].is_string());
    }
}
