//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationRepository` - Conversation/message writes
//! - `ConversationReader` - Conversation list and history queries
//! - `AIProvider` - External reply generator

mod ai_provider;
mod conversation_reader;
mod conversation_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole, ProviderInfo,
};
pub use conversation_reader::ConversationReader;
pub use conversation_repository::ConversationRepository;
