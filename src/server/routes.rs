//! HTTP route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{health, ready, root, status, ServerContext};

/// Create the server router: the live channel on the origin root, health
/// endpoints, and the operator console assets from `public/`.
pub fn create_router(ctx: ServerContext) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/api/v1/status", get(status))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{event_fixture, MockCatalog};
    use crate::execution::{Dispatcher, MockGateway};
    use crate::server::session::Session;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_context(catalog: MockCatalog) -> ServerContext {
        let dispatcher = Dispatcher::new(Arc::new(MockGateway::new()), Duration::from_millis(100));
        ServerContext::new(Arc::new(Session::new(Arc::new(catalog), dispatcher)))
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(test_context(MockCatalog::new()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_503_before_a_match_is_loaded() {
        let app = create_router(test_context(MockCatalog::new()));

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_200_once_loaded() {
        let catalog =
            MockCatalog::new().with_event(event_fixture("team-a-vs-team-b", vec![]));
        let ctx = test_context(catalog);
        ctx.session.load_event("team-a-vs-team-b").await.unwrap();
        let app = create_router(ctx);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn plain_get_on_root_redirects_to_the_console() {
        let app = create_router(test_context(MockCatalog::new()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn status_endpoint_reports_score_and_observers() {
        let app = create_router(test_context(MockCatalog::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
