//! Chat HTTP adapter - REST endpoints for the support widget.
//!
//! - `POST /chat/message` - Send a message, receive the generated reply
//! - `GET /chat/conversations` - Recent conversations
//! - `GET /chat/history/:session_id` - One conversation's transcript

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ChatApiError, ChatAppState};
pub use routes::{chat_router, chat_routes};
