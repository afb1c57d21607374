//! Conversation reader port (read side / CQRS queries).
//!
//! Defines the contract for conversation listing and message history reads.
//!
//! # Design
//!
//! - **Read-optimized**: returns summaries and message lists, not aggregates
//! - **Separated from write**: CQRS pattern, mirrors `ConversationRepository`
//! - **Ordering**: messages come back oldest first; ties keep insertion order

use crate::domain::conversation::{ConversationSummary, Message};
use crate::domain::foundation::{ConversationId, DomainError, MessageId};
use async_trait::async_trait;

/// Reader port for conversation queries.
#[async_trait]
pub trait ConversationReader: Send + Sync {
    /// List the most recently updated conversations, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<ConversationSummary>, DomainError>;

    /// All messages of a conversation, oldest first.
    ///
    /// Returns an empty list for an unknown conversation; callers check
    /// existence through the repository.
    async fn get_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, DomainError>;

    /// The `limit` most recent messages of a conversation, returned oldest
    /// first, skipping the message identified by `exclude`.
    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        exclude: &MessageId,
        limit: u32,
    ) -> Result<Vec<Message>, DomainError>;
}
