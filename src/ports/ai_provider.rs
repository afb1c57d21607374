//! AI Provider Port - Interface for the external reply generator.
//!
//! This port abstracts the generative-text API so the chat orchestration can
//! request a reply without coupling to a specific provider.
//!
//! # Design
//!
//! - One request, one response: the remote side holds no session
//! - Provider-agnostic message format (history + current user message)
//! - Errors carry a sanitized, user-facing message via [`AIError::user_message`]
//! - No retries: any failure is surfaced immediately
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
//!         Ok(CompletionResponse::new(last, "echo"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::Sender;
use crate::domain::foundation::ConversationId;

/// Port for AI/LLM reply generation.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Prior turns in chronological order, followed by the current user message.
    pub messages: Vec<Message>,
    /// Conversation this request belongs to (for tracing).
    pub conversation_id: ConversationId,
}

impl CompletionRequest {
    /// Creates an empty request for a conversation.
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            messages: Vec::new(),
            conversation_id,
        }
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }

    /// Splits into (history, current user message).
    ///
    /// The current message is the final entry; it is `None` only for an
    /// empty request.
    pub fn split_current(&self) -> (&[Message], Option<&Message>) {
        match self.messages.split_last() {
            Some((last, history)) => (history, Some(last)),
            None => (&[], None),
        }
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl From<Sender> for MessageRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => MessageRole::User,
            Sender::Ai => MessageRole::Assistant,
        }
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated plain-text reply.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
}

impl CompletionResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini").
    pub name: String,
    /// Model identifier (e.g., "gemini-2.0-flash").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    /// Provider rejected the request (HTTP 400).
    #[error("invalid request: {}", .0.as_deref().unwrap_or("no detail"))]
    InvalidRequest(Option<String>),

    /// API key or authentication failed (HTTP 401/403).
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Rate limited by provider (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Provider is unavailable (HTTP 5xx).
    #[error("provider unavailable: status {status}")]
    Unavailable {
        /// HTTP status returned.
        status: u16,
    },

    /// Any other non-success status.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// Output was blocked by the provider's safety filter.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Finish reason reported by the provider.
        reason: String,
    },

    /// Provider returned no text.
    #[error("empty response")]
    EmptyResponse,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out at the transport.
    #[error("request timed out")]
    Timeout,

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl AIError {
    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Sanitized message safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            AIError::InvalidRequest(Some(detail)) if !detail.is_empty() => detail.clone(),
            AIError::InvalidRequest(_) => {
                "Invalid request. Please try rephrasing your message.".to_string()
            }
            AIError::AuthenticationFailed => {
                "Invalid API key. Please check the Gemini API key configuration.".to_string()
            }
            AIError::RateLimited => "Rate limit exceeded. Please try again in a moment.".to_string(),
            AIError::Unavailable { .. } => {
                "AI service temporarily unavailable. Please try again.".to_string()
            }
            AIError::ContentFiltered { .. } => {
                "I cannot respond to that request. Please try rephrasing.".to_string()
            }
            AIError::EmptyResponse => "No response generated. Please try again.".to_string(),
            AIError::Network(_) | AIError::Timeout => {
                "Unable to reach AI service. Please check your connection.".to_string()
            }
            AIError::UnexpectedStatus(_) | AIError::Parse(_) => {
                "Failed to generate response. Please try again.".to_string()
            }
        }
    }
}
