//! Route table and HTTP middleware

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;

/// Create the main API router.
///
/// JSON bodies are capped at `max_upload_bytes`. The transcription route has
/// no body cap: its handler streams the form and enforces the ceiling on the
/// audio field alone.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/api/chat", post(handlers::chat))
        .route(
            "/api/transcribe",
            post(handlers::transcribe).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/tts", post(handlers::tts))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        );

    if server.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}
