//! In-Memory Conversation Store Adapter
//!
//! Stores conversations and messages in memory, implementing both the
//! repository (write) and reader (query) ports.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{Conversation, ConversationSummary, Message};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, MessageId, Timestamp};
use crate::ports::{ConversationReader, ConversationRepository};

/// In-memory storage for conversations and their messages
#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
    // Insertion order doubles as the tiebreaker for equal timestamps.
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryConversationStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Get the number of stored conversations
    pub async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Get the number of stored messages across all conversations
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }

    async fn ordered_messages(&self, conversation_id: &ConversationId) -> Vec<Message> {
        let messages = self.messages.read().await;
        let mut owned: Vec<Message> = messages
            .iter()
            .filter(|m| m.conversation_id() == *conversation_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal timestamps.
        owned.sort_by_key(|m| m.created_at());
        owned
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &ConversationId) -> DomainError {
    DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
        .with_detail("conversation_id", id.to_string())
}

#[async_trait]
impl ConversationRepository for InMemoryConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn add_message(&self, message: &Message) -> Result<(), DomainError> {
        let conversation_id = message.conversation_id();
        if !self.conversations.read().await.contains_key(&conversation_id) {
            return Err(not_found(&conversation_id));
        }
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn touch(&self, id: &ConversationId, at: Timestamp) -> Result<(), DomainError> {
        let mut conversations = self.conversations.write().await;
        let existing = conversations.get_mut(id).ok_or_else(|| not_found(id))?;
        *existing = Conversation::reconstitute(existing.id(), existing.created_at(), at);
        Ok(())
    }
}

#[async_trait]
impl ConversationReader for InMemoryConversationStore {
    async fn list_recent(&self, limit: u32) -> Result<Vec<ConversationSummary>, DomainError> {
        let mut conversations: Vec<Conversation> =
            self.conversations.read().await.values().cloned().collect();
        conversations.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        conversations.truncate(limit as usize);

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let first_message = self
                .ordered_messages(&conversation.id())
                .await
                .into_iter()
                .next()
                .map(|m| m.text().to_string());
            summaries.push(ConversationSummary {
                id: conversation.id(),
                created_at: conversation.created_at(),
                updated_at: conversation.updated_at(),
                first_message,
            });
        }
        Ok(summaries)
    }

    async fn get_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, DomainError> {
        Ok(self.ordered_messages(conversation_id).await)
    }

    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        exclude: &MessageId,
        limit: u32,
    ) -> Result<Vec<Message>, DomainError> {
        let mut messages: Vec<Message> = self
            .ordered_messages(conversation_id)
            .await
            .into_iter()
            .filter(|m| m.id() != *exclude)
            .collect();
        let skip = messages.len().saturating_sub(limit as usize);
        Ok(messages.split_off(skip))
    }
}
