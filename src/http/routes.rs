//! Route table for the HTTP worker.
//!
//! # Responsibilities
//! - Register the shutdown endpoint
//! - Wire up middleware (request ID, tracing, timeout)

use axum::{extract::State, routing::any, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::CancellationToken;
use crate::observability::metrics;

/// Body returned by the shutdown endpoint.
pub const SHUTDOWN_ACK: &str = "shutdown";

/// Build the router with the shutdown endpoint and middleware layers.
#[allow(deprecated)]
pub fn build_router(token: CancellationToken, config: &HttpConfig) -> Router {
    Router::new()
        .route(&config.shutdown_path, any(shutdown_handler))
        .with_state(token)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
}

/// Trigger process shutdown and acknowledge.
async fn shutdown_handler(State(token): State<CancellationToken>) -> &'static str {
    metrics::record_shutdown_request();
    if token.trigger() {
        tracing::info!("Shutdown requested over HTTP");
    } else {
        tracing::debug!("Shutdown already in progress");
    }
    SHUTDOWN_ACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_shutdown_endpoint_triggers_token() {
        let token = CancellationToken::new();
        let app = build_router(token.clone(), &HttpConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/shutdown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], SHUTDOWN_ACK.as_bytes());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_other_paths_do_not_trigger() {
        let token = CancellationToken::new();
        let app = build_router(token.clone(), &HttpConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/other").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn test_custom_shutdown_path_and_request_id_kept() {
        let token = CancellationToken::new();
        let config = HttpConfig {
            shutdown_path: "/admin/stop".into(),
            ..HttpConfig::default()
        };
        let app = build_router(token.clone(), &config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/stop")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_REQUEST_ID], "abc-123");
        assert!(token.is_cancelled());
    }
}
