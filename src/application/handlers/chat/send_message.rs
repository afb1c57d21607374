//! SendMessage command handler.
//!
//! Runs one chat turn: resolve or create the conversation, store the user
//! message, gather recent history, ask the generator for a reply, then store
//! the reply and bump the conversation's update time.
//!
//! The user message is written before the generator is called and is never
//! rolled back. A failed generation still leaves the customer's text on
//! record, and the caller gets the conversation id back to retry with.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::{Conversation, Message, MessageText};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, ConversationReader, ConversationRepository, MessageRole,
};

/// Number of prior messages handed to the generator as context.
pub const HISTORY_LIMIT: u32 = 20;

/// Which conversation a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSelector {
    /// Start a fresh conversation.
    New,
    /// Continue an existing conversation.
    Existing(ConversationId),
}

impl From<Option<ConversationId>> for SessionSelector {
    fn from(id: Option<ConversationId>) -> Self {
        match id {
            Some(id) => SessionSelector::Existing(id),
            None => SessionSelector::New,
        }
    }
}

/// Command to send a message, already validated at the boundary.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub text: MessageText,
    pub session: SessionSelector,
}

impl SendMessageCommand {
    pub fn new(text: MessageText, session: SessionSelector) -> Self {
        Self { text, session }
    }
}

/// Result of a successful turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageResult {
    /// Generated reply text, as stored.
    pub reply: String,
    /// Conversation the turn was recorded in.
    pub conversation_id: ConversationId,
}

/// Errors that can occur when sending a message.
#[derive(Debug, Clone, Error)]
pub enum SendMessageError {
    /// The referenced conversation does not exist.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// The generator failed after the user message was stored.
    #[error("Reply generation failed for conversation {conversation_id}: {source}")]
    Generation {
        conversation_id: ConversationId,
        #[source]
        source: AIError,
    },

    /// Persistence failure.
    #[error("Repository error: {0}")]
    Repository(DomainError),
}

impl From<DomainError> for SendMessageError {
    fn from(err: DomainError) -> Self {
        if err.code() == ErrorCode::ConversationNotFound {
            let id = err
                .details
                .get("conversation_id")
                .and_then(|raw| raw.parse::<ConversationId>().ok());
            if let Some(id) = id {
                return SendMessageError::ConversationNotFound(id);
            }
        }
        SendMessageError::Repository(err)
    }
}

/// Handler for chat turns.
pub struct SendMessageHandler {
    repository: Arc<dyn ConversationRepository>,
    reader: Arc<dyn ConversationReader>,
    ai_provider: Arc<dyn AIProvider>,
}

impl SendMessageHandler {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        reader: Arc<dyn ConversationReader>,
        ai_provider: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            repository,
            reader,
            ai_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<SendMessageResult, SendMessageError> {
        let conversation_id = self.resolve_conversation(cmd.session).await?;

        let user_message = Message::user(conversation_id, cmd.text);
        self.repository.add_message(&user_message).await?;

        let history = self
            .reader
            .recent_messages(&conversation_id, &user_message.id(), HISTORY_LIMIT)
            .await?;

        let request = history
            .iter()
            .fold(CompletionRequest::new(conversation_id), |request, message| {
                request.with_message(MessageRole::from(message.sender()), message.text())
            })
            .with_message(MessageRole::User, user_message.text());

        tracing::debug!(
            conversation_id = %conversation_id,
            history_len = history.len(),
            "Requesting reply"
        );

        let completion = self.ai_provider.complete(request).await.map_err(|source| {
            tracing::warn!(
                conversation_id = %conversation_id,
                error = %source,
                "Reply generation failed"
            );
            SendMessageError::Generation {
                conversation_id,
                source,
            }
        })?;

        let reply = Message::ai(conversation_id, completion.content);
        self.repository.add_message(&reply).await?;
        self.repository
            .touch(&conversation_id, reply.created_at())
            .await?;

        tracing::info!(
            conversation_id = %conversation_id,
            model = %completion.model,
            "Chat turn completed"
        );

        Ok(SendMessageResult {
            reply: reply.text().to_string(),
            conversation_id,
        })
    }

    async fn resolve_conversation(
        &self,
        session: SessionSelector,
    ) -> Result<ConversationId, SendMessageError> {
        match session {
            SessionSelector::New => {
                let conversation = Conversation::new();
                self.repository.create(&conversation).await?;
                tracing::info!(conversation_id = %conversation.id(), "Conversation created");
                Ok(conversation.id())
            }
            SessionSelector::Existing(id) => self
                .repository
                .find_by_id(&id)
                .await?
                .map(|conversation| conversation.id())
                .ok_or(SendMessageError::ConversationNotFound(id)),
        }
    }
}
