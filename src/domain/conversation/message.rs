//! Message entity for conversations.
//!
//! Messages are immutable, append-only records of one side of a turn.
//! Each message has a sender (user/ai), text, and creation timestamp.

use crate::domain::foundation::{ConversationId, MessageId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The customer typing into the widget.
    User,
    /// The generated support reply.
    Ai,
}

impl Sender {
    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Sender::User),
            "ai" => Some(Sender::Ai),
            _ => None,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied message text, validated to 1..=5000 characters.
///
/// Text is kept verbatim; no trimming or normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Maximum number of characters accepted from a user.
    pub const MAX_CHARS: usize = 5000;

    /// Validates and wraps user text.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the text is empty
    /// - `TooLong` if the text exceeds [`MessageText::MAX_CHARS`] characters
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        let chars = text.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::too_long("message", Self::MAX_CHARS, chars));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `conversation_id` refers to an existing conversation
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    conversation_id: ConversationId,
    sender: Sender,
    text: String,
    created_at: Timestamp,
}

impl Message {
    /// Creates a user message from validated text.
    pub fn user(conversation_id: ConversationId, text: MessageText) -> Self {
        Self::new(conversation_id, Sender::User, text.into_inner())
    }

    /// Creates an AI reply message.
    pub fn ai(conversation_id: ConversationId, text: impl Into<String>) -> Self {
        Self::new(conversation_id, Sender::Ai, text.into())
    }

    fn new(conversation_id: ConversationId, sender: Sender, text: String) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender,
            text,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a message from persistence.
    pub fn reconstitute(
        id: MessageId,
        conversation_id: ConversationId,
        sender: Sender,
        text: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender,
            text,
            created_at,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
