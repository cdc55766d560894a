//! HTTP API gateway for Stylecast.
//!
//! Exposes the style service over REST: profile inspection and direct
//! edits, training, topic classification, styled chat and rewrite.
//!
//! Built on Axum. Remote model failures are answered with a tagged error
//! body; they never take the process down.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::{Router, http::StatusCode, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use stylecast_profile::StyleService;

/// Request body cap for every route.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Build the full router: `/health` plus the v1 API.
pub fn build_router(state: api_v1::SharedApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::PUT,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: stylecast_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = stylecast_providers::router::default_from_config(&config);
    if provider.is_demo() {
        warn!("No usable API key; chat and training run in demo mode");
    }

    let service = StyleService::from_config(&config, provider);
    let state = Arc::new(api_v1::ApiV1State { service });
    let app = build_router(state);

    info!(addr = %addr, profile = %config.profile.path.display(), "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> (StatusCode, Json<api_v1::ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(api_v1::ErrorBody::new("not_found", "no such route")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use stylecast_profile::{ProfileStore, TrainingCorpus};
    use tower::ServiceExt;

    fn test_state(dir: &tempfile::TempDir) -> api_v1::SharedApiState {
        let store = Arc::new(ProfileStore::new(dir.path().join("style_profile.json")));
        let corpus = TrainingCorpus::new(dir.path().join("training"));
        let provider = Arc::new(stylecast_providers::DemoProvider::new("test"));
        Arc::new(api_v1::ApiV1State {
            service: StyleService::new(store, corpus, provider),
        })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_tagged_404() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let req = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["kind"], "not_found");
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let content = "x".repeat(BODY_LIMIT + 1);
        let body = serde_json::json!({ "content": content, "source": "big" }).to_string();
        let req = Request::builder()
            .method("POST")
            .uri("/v1/train")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["kind"], "invalid_input");
    }
}
