//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{current, history, status};
use super::sse::handler::sse_handler;
use super::websocket::handler::ws_handler;
use crate::broadcast::ConnectionRegistry;

/// Create the Axum router with all endpoints
pub fn create_router(registry: Arc<ConnectionRegistry>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Streaming transports
        .route("/ws", get(ws_handler))
        .route("/api/stream", get(sse_handler))
        // Health check
        .route("/health", get(health_check))
        // REST endpoints
        .route("/api/temperature", get(current::get_current))
        .route("/api/temperature/history", get(history::get_history))
        .route("/api/status", get(status::get_status))
        .layer(cors)
        .with_state(registry)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn test_app() -> (Router, Arc<ConnectionRegistry>) {
        let registry = Arc::new(ConnectionRegistry::new());
        (create_router(Arc::clone(&registry)), registry)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_current_temperature_shape() {
        let (app, _) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/temperature")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["temperature"], "34.4");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_non_get_is_method_not_allowed() {
        let (app, _) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/temperature")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_history_default_limit() {
        let (app, registry) = test_app();
        for _ in 0..15 {
            let value = registry.current_reading();
            registry.history().record(&value);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/temperature/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["readings"].as_array().unwrap().len(), 10);
        assert!(json["readings"][0]["readingId"].is_string());
    }

    #[tokio::test]
    async fn test_history_respects_limit_param() {
        let (app, registry) = test_app();
        for _ in 0..5 {
            let value = registry.current_reading();
            registry.history().record(&value);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/temperature/history?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["readings"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_status_reports_subscribers_and_timer() {
        let (app, registry) = test_app();
        let _session = registry.attach();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["active_subscribers"], 1);
        assert_eq!(json["streaming"], true);
    }
}
