//! Axum routes for chat endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_history, list_conversations, send_message, ChatAppState};

/// Creates routes for chat endpoints.
///
/// - POST /message - Send a message, receive the reply
/// - GET /conversations - Recent conversations with previews
/// - GET /history/:session_id - Full transcript of one conversation
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/message", post(send_message))
        .route("/conversations", get(list_conversations))
        .route("/history/:session_id", get(get_history))
}

/// Chat routes nested under /chat.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().nest("/chat", chat_routes())
}
