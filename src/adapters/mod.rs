//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Reply generators (Gemini, mock)
//! - `http` - Axum REST surface
//! - `postgres` - PostgreSQL persistence
//! - `storage` - In-memory persistence for tests and local runs

pub mod ai;
pub mod http;
pub mod postgres;
pub mod storage;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider};
pub use http::{build_router, ChatAppState};
pub use postgres::{PostgresConversationReader, PostgresConversationRepository};
pub use storage::InMemoryConversationStore;
