//! HTTP DTOs for chat endpoints.
//!
//! Request bodies arrive as loose JSON and are checked field by field here,
//! so the client gets one entry per problem instead of a single parse error.

use serde::Serialize;
use serde_json::Value;

use crate::application::{SendMessageCommand, SessionSelector};
use crate::domain::conversation::{ConversationSummary, Message, MessageText};
use crate::domain::foundation::{ConversationId, ValidationError};

// ════════════════════════════════════════════════════════════════════════════════
// Request validation
// ════════════════════════════════════════════════════════════════════════════════

/// One failed check on the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field; empty for the body itself.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self::new("", message)
    }
}

pub const REQUIRED: &str = "Required";
pub const EXPECTED_STRING: &str = "Expected string";
pub const EXPECTED_OBJECT: &str = "Expected object";
pub const MESSAGE_EMPTY: &str = "Message cannot be empty";
pub const MESSAGE_TOO_LONG: &str = "Message too long (max 5000 characters)";
pub const INVALID_UUID: &str = "Invalid uuid";

/// Parses a session id in canonical hyphenated form.
///
/// Braced, URN and unhyphenated spellings are rejected even though `uuid`
/// would accept them.
pub fn parse_session_id(raw: &str) -> Option<ConversationId> {
    if raw.len() != 36 {
        return None;
    }
    uuid::Uuid::try_parse(raw)
        .ok()
        .map(ConversationId::from_uuid)
}

/// Validates a `POST /chat/message` body.
///
/// Every field is checked; all problems are reported together.
pub fn validate_send_message(body: &Value) -> Result<SendMessageCommand, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError::body(EXPECTED_OBJECT)]);
    };

    let mut errors = Vec::new();

    let text = match object.get("message") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("message", REQUIRED));
            None
        }
        Some(Value::String(s)) => match MessageText::new(s.as_str()) {
            Ok(text) => Some(text),
            Err(err) => {
                errors.push(message_error(&err));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new("message", EXPECTED_STRING));
            None
        }
    };

    let session = match object.get("sessionId") {
        None => Some(SessionSelector::New),
        Some(Value::String(s)) => match parse_session_id(s) {
            Some(id) => Some(SessionSelector::Existing(id)),
            None => {
                errors.push(FieldError::new("sessionId", INVALID_UUID));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new("sessionId", EXPECTED_STRING));
            None
        }
    };

    match (text, session) {
        (Some(text), Some(session)) if errors.is_empty() => {
            Ok(SendMessageCommand::new(text, session))
        }
        _ => Err(errors),
    }
}

fn message_error(err: &ValidationError) -> FieldError {
    let message = match err {
        ValidationError::EmptyField { .. } => MESSAGE_EMPTY,
        ValidationError::TooLong { .. } => MESSAGE_TOO_LONG,
    };
    FieldError::new(err.field(), message)
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Successful chat turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub reply: String,
    pub session_id: String,
}

/// Conversation list.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationItem>,
}

/// One row of the conversation list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationItem {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub preview: String,
}

impl From<&ConversationSummary> for ConversationItem {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            created_at: summary.created_at.to_wire(),
            updated_at: summary.updated_at.to_wire(),
            preview: summary.preview(),
        }
    }
}

/// Full transcript of one conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<MessageView>,
}

/// One message in a transcript.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub timestamp: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            sender: message.sender().as_str().to_string(),
            text: message.text().to_string(),
            timestamp: message.created_at().to_wire(),
        }
    }
}

/// Error envelope shared by all chat endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
            session_id: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}
