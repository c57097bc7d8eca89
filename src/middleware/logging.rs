//! Access log for the HTTP surface.
//!
//! One line per request: method, path, status and latency. Query strings are
//! left out because ticket codes travel in them.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Liveness checks are polled too often to be worth logging.
const QUIET_PATHS: [&str; 1] = ["/health"];

/// Server errors log at WARN. Client rejections (bad credentials, missing
/// token, wrong role) log at INFO so they can be filtered separately.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    if QUIET_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();
    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), latency_ms, "Request failed (5xx)");
    } else if status.is_client_error() {
        info!(%method, %path, status = status.as_u16(), latency_ms, "Request rejected (4xx)");
    } else {
        info!(%method, %path, status = status.as_u16(), latency_ms, "Request completed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::to_bytes,
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route("/denied", get(|| async { StatusCode::UNAUTHORIZED }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/health", get(|| async { "up" }))
            .layer(middleware::from_fn(request_logging))
    }

    async fn call(uri: &str) -> Response {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_every_status_class_passes_through() {
        for (uri, expected) in [
            ("/ok", StatusCode::OK),
            ("/denied", StatusCode::UNAUTHORIZED),
            ("/broken", StatusCode::INTERNAL_SERVER_ERROR),
            ("/missing?code=SECRET", StatusCode::NOT_FOUND),
        ] {
            assert_eq!(call(uri).await.status(), expected, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_quiet_path_body_untouched() {
        let response = call("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"up");
    }
}
