//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin), request body limit, tracing.
//! Unknown paths get a JSON 404.

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::chat::{chat_router, dto::ErrorResponse, ChatAppState};
use super::health::health_check;

/// Default maximum request body size (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: ChatAppState, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    chat_router()
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
