//! HTTP handlers: the live-channel upgrade and operational endpoints.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use super::session::Session;
use super::ws::serve_observer;
use crate::catalog::Score;

/// Shared server context handed to every handler.
#[derive(Clone)]
pub struct ServerContext {
    /// The operator session.
    pub session: Arc<Session>,
}

impl ServerContext {
    /// Create a context over a session.
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether a match is loaded and goals can be recorded.
    pub ready: bool,
    /// Slug of the loaded match, if any.
    pub event: Option<String>,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Slug of the loaded match, if any.
    pub event: Option<String>,
    /// Live score.
    pub score: Score,
    /// Connected observers.
    pub observers: usize,
}

/// The root endpoint: a WebSocket upgrade becomes a live-channel observer
/// (the console connects to the origin root); a plain GET is sent to the
/// console assets.
pub async fn root(
    State(ctx): State<ServerContext>,
    upgrade: Option<WebSocketUpgrade>,
) -> Response {
    match upgrade {
        Some(upgrade) => {
            let session = Arc::clone(&ctx.session);
            upgrade
                .on_upgrade(move |socket| serve_observer(socket, session))
                .into_response()
        }
        None => Redirect::temporary("/index.html").into_response(),
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness handler - 200 once a match is loaded, 503 before.
pub async fn ready(State(ctx): State<ServerContext>) -> impl IntoResponse {
    let event = ctx.session.current_slug().await;
    let is_ready = event.is_some();

    let response = ReadyResponse {
        ready: is_ready,
        event,
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Status handler - current match, score and observer count.
pub async fn status(State(ctx): State<ServerContext>) -> impl IntoResponse {
    let snapshot = ctx.session.snapshot().await;

    Json(StatusResponse {
        status: "running",
        event: snapshot.match_.map(|event| event.slug),
        score: snapshot.score,
        observers: ctx.session.observer_count(),
    })
}
