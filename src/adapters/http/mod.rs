//! HTTP adapters - REST API for the support chat widget.

pub mod chat;
pub mod health;
pub mod router;

pub use chat::{ChatApiError, ChatAppState};
pub use router::{build_router, DEFAULT_BODY_LIMIT};
