//! Conversation entity and its list-view summary.

use crate::domain::foundation::{ConversationId, Timestamp};

/// A persisted thread of support messages.
///
/// Only `updated_at` ever changes after creation; conversations are never
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    id: ConversationId,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    /// Starts a new conversation.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a conversation from persistence.
    pub fn reconstitute(id: ConversationId, created_at: Timestamp, updated_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Read model for the conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Text of the earliest message, if any message exists.
    pub first_message: Option<String>,
}

impl ConversationSummary {
    /// Number of characters shown in a preview.
    pub const PREVIEW_CHARS: usize = 50;

    /// Placeholder used when a conversation has no messages yet.
    pub const EMPTY_PREVIEW: &'static str = "No messages";

    /// Short preview of the conversation's first message.
    pub fn preview(&self) -> String {
        match self.first_message.as_deref() {
            Some(text) if !text.is_empty() => text.chars().take(Self::PREVIEW_CHARS).collect(),
            _ => Self::EMPTY_PREVIEW.to_string(),
        }
    }
}
