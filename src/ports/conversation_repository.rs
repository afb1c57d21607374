//! Conversation repository port (write side).
//!
//! Defines the contract for persisting conversations and appending messages.
//!
//! # Design
//!
//! - **Append-only**: messages are inserted, never updated or deleted
//! - **No deletes**: conversations live forever
//! - **Independent writes**: each call commits on its own, so a later failure
//!   never rolls back an earlier append

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{ConversationId, DomainError, Timestamp};
use async_trait::async_trait;

/// Repository port for conversation persistence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Save a new conversation.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Find a conversation by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError>;

    /// Append a message to its conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the owning conversation doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn add_message(&self, message: &Message) -> Result<(), DomainError>;

    /// Set the conversation's `updated_at`.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if conversation doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn touch(&self, id: &ConversationId, at: Timestamp) -> Result<(), DomainError>;
}
