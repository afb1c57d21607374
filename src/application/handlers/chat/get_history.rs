//! GetHistoryHandler - Query handler for one conversation's full transcript.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::Message;
use crate::domain::foundation::{ConversationId, DomainError};
use crate::ports::{ConversationReader, ConversationRepository};

/// Query for a conversation's messages.
#[derive(Debug, Clone, Copy)]
pub struct GetHistoryQuery {
    pub conversation_id: ConversationId,
}

/// Errors that can occur when fetching history.
#[derive(Debug, Clone, Error)]
pub enum GetHistoryError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Repository error: {0}")]
    Repository(#[from] DomainError),
}

/// Handler for fetching history.
pub struct GetHistoryHandler {
    repository: Arc<dyn ConversationRepository>,
    reader: Arc<dyn ConversationReader>,
}

impl GetHistoryHandler {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        reader: Arc<dyn ConversationReader>,
    ) -> Self {
        Self { repository, reader }
    }

    /// Messages oldest first. Unknown conversations are an error, not an empty list.
    pub async fn handle(&self, query: GetHistoryQuery) -> Result<Vec<Message>, GetHistoryError> {
        if self
            .repository
            .find_by_id(&query.conversation_id)
            .await?
            .is_none()
        {
            return Err(GetHistoryError::NotFound(query.conversation_id));
        }

        Ok(self.reader.get_messages(&query.conversation_id).await?)
    }
}
