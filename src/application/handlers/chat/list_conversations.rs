//! ListConversationsHandler - Query handler for the conversation sidebar.

use std::sync::Arc;

use crate::domain::conversation::ConversationSummary;
use crate::domain::foundation::DomainError;
use crate::ports::ConversationReader;

/// Maximum number of conversations returned.
pub const LIST_LIMIT: u32 = 20;

/// Handler for listing recent conversations.
pub struct ListConversationsHandler {
    reader: Arc<dyn ConversationReader>,
}

impl ListConversationsHandler {
    pub fn new(reader: Arc<dyn ConversationReader>) -> Self {
        Self { reader }
    }

    /// Most recently updated conversations first.
    pub async fn handle(&self) -> Result<Vec<ConversationSummary>, DomainError> {
        self.reader.list_recent(LIST_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::conversation::{Conversation, Message, MessageText};
    use crate::domain::foundation::{ConversationId, ErrorCode, MessageId, Timestamp};
    use crate::ports::ConversationRepository;
    use async_trait::async_trait;

    struct FailingReader;

    #[async_trait]
    impl ConversationReader for FailingReader {
        async fn list_recent(&self, _limit: u32) -> Result<Vec<ConversationSummary>, DomainError> {
            Err(DomainError::database("Failed to list conversations", "connection reset"))
        }

        async fn get_messages(
            &self,
            _conversation_id: &ConversationId,
        ) -> Result<Vec<Message>, DomainError> {
            Ok(vec![])
        }

        async fn recent_messages(
            &self,
            _conversation_id: &ConversationId,
            _exclude: &MessageId,
            _limit: u32,
        ) -> Result<Vec<Message>, DomainError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn caps_at_limit_and_orders_by_recency() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut ids = Vec::new();
        for _ in 0..25 {
            let conversation = Conversation::new();
            store.create(&conversation).await.unwrap();
            ids.push(conversation.id());
        }
        store.touch(&ids[3], Timestamp::now()).await.unwrap();

        let handler = ListConversationsHandler::new(store);
        let listed = handler.handle().await.unwrap();

        assert_eq!(listed.len(), LIST_LIMIT as usize);
        assert_eq!(listed[0].id, ids[3]);
        for pair in listed.windows(2) {
            assert!(pair[0].updated_at >= pair[1].updated_at);
        }
    }

    #[tokio::test]
    async fn summaries_carry_first_message_preview() {
        let store = Arc::new(InMemoryConversationStore::new());
        let conversation = Conversation::new();
        store.create(&conversation).await.unwrap();
        let long = "x".repeat(80);
        store
            .add_message(&Message::user(conversation.id(), MessageText::new(long).unwrap()))
            .await
            .unwrap();
        let empty = Conversation::new();
        store.create(&empty).await.unwrap();

        let listed = ListConversationsHandler::new(store).handle().await.unwrap();

        let with_text = listed.iter().find(|s| s.id == conversation.id()).unwrap();
        assert_eq!(with_text.preview().chars().count(), 50);
        let without = listed.iter().find(|s| s.id == empty.id()).unwrap();
        assert_eq!(without.preview(), "No messages");
    }

    #[tokio::test]
    async fn propagates_reader_errors() {
        let handler = ListConversationsHandler::new(Arc::new(FailingReader));
        let err = handler.handle().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
