//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to the chat application handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::application::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, ListConversationsHandler,
    SendMessageError, SendMessageHandler,
};
use crate::domain::foundation::ConversationId;
use crate::ports::{AIProvider, ConversationReader, ConversationRepository};

use super::dto::{
    parse_session_id, validate_send_message, ConversationItem, ConversationListResponse,
    ErrorResponse, FieldError, HistoryResponse, MessageView, SendMessageResponse, EXPECTED_OBJECT,
    REQUIRED,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub send_message: Arc<SendMessageHandler>,
    pub list_conversations: Arc<ListConversationsHandler>,
    pub get_history: Arc<GetHistoryHandler>,
}

impl ChatAppState {
    /// Wires the chat handlers over the given ports.
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        reader: Arc<dyn ConversationReader>,
        ai_provider: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            send_message: Arc::new(SendMessageHandler::new(
                repository.clone(),
                reader.clone(),
                ai_provider,
            )),
            list_conversations: Arc::new(ListConversationsHandler::new(reader.clone())),
            get_history: Arc::new(GetHistoryHandler::new(repository, reader)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /chat/message
// ════════════════════════════════════════════════════════════════════════════════

/// POST /chat/message - Send one customer message and get the reply.
///
/// # Errors
/// - 400 Bad Request: Body failed validation
/// - 404 Not Found: `sessionId` does not name a conversation
/// - 500 Internal Server Error: Generation failed (user message is kept)
pub async fn send_message(
    State(state): State<ChatAppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ChatApiError> {
    let Json(body) = payload.map_err(ChatApiError::from_rejection)?;
    let command = validate_send_message(&body).map_err(ChatApiError::Validation)?;

    let result = state
        .send_message
        .handle(command)
        .await
        .map_err(|e| match e {
            SendMessageError::ConversationNotFound(_) => ChatApiError::NotFound,
            SendMessageError::Generation {
                conversation_id,
                source,
            } => ChatApiError::Generation {
                message: source.user_message(),
                conversation_id,
            },
            SendMessageError::Repository(err) => {
                ChatApiError::internal(UNEXPECTED_ERROR, err.to_string())
            }
        })?;

    Ok((
        StatusCode::OK,
        Json(SendMessageResponse {
            reply: result.reply,
            session_id: result.conversation_id.to_string(),
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /chat/conversations
// ════════════════════════════════════════════════════════════════════════════════

/// GET /chat/conversations - Most recently updated conversations.
pub async fn list_conversations(
    State(state): State<ChatAppState>,
) -> Result<impl IntoResponse, ChatApiError> {
    let summaries = state
        .list_conversations
        .handle()
        .await
        .map_err(|e| ChatApiError::internal("Failed to fetch conversations", e.to_string()))?;

    let conversations = summaries.iter().map(ConversationItem::from).collect();
    Ok((StatusCode::OK, Json(ConversationListResponse { conversations })))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /chat/history/:session_id
// ════════════════════════════════════════════════════════════════════════════════

/// GET /chat/history/:session_id - Full transcript, oldest first.
///
/// # Errors
/// - 400 Bad Request: Session id is not a UUID
/// - 404 Not Found: Conversation does not exist
pub async fn get_history(
    State(state): State<ChatAppState>,
    session_id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ChatApiError> {
    // A segment that does not decode to UTF-8 is just another malformed id.
    let Path(session_id) = session_id.map_err(|_| ChatApiError::InvalidSessionId)?;
    let conversation_id = parse_session_id(&session_id).ok_or(ChatApiError::InvalidSessionId)?;

    let messages = state
        .get_history
        .handle(GetHistoryQuery { conversation_id })
        .await
        .map_err(|e| match e {
            GetHistoryError::NotFound(_) => ChatApiError::NotFound,
            GetHistoryError::Repository(err) => {
                ChatApiError::internal("Failed to fetch conversation history", err.to_string())
            }
        })?;

    Ok((
        StatusCode::OK,
        Json(HistoryResponse {
            session_id,
            messages: messages.iter().map(MessageView::from).collect(),
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// API error type for chat endpoints.
#[derive(Debug)]
pub enum ChatApiError {
    /// Body failed field validation.
    Validation(Vec<FieldError>),
    /// Path session id is malformed.
    InvalidSessionId,
    /// Conversation does not exist.
    NotFound,
    /// Generator failed; the client may retry in the same conversation.
    Generation {
        message: String,
        conversation_id: ConversationId,
    },
    /// Body could not be read at all (e.g. over the size limit).
    Rejected { status: StatusCode, message: String },
    /// Unclassified failure. `detail` is logged, never returned.
    Internal {
        public: &'static str,
        detail: String,
    },
}

impl ChatApiError {
    pub fn internal(public: &'static str, detail: impl Into<String>) -> Self {
        ChatApiError::Internal {
            public,
            detail: detail.into(),
        }
    }

    fn from_rejection(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ChatApiError::Validation(vec![FieldError::body(REQUIRED)])
            }
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                ChatApiError::Validation(vec![FieldError::body(EXPECTED_OBJECT)])
            }
            other => ChatApiError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ChatApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Validation failed").with_details(details),
            ),
            ChatApiError::InvalidSessionId => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid session ID format"),
            ),
            ChatApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Conversation not found"),
            ),
            ChatApiError::Generation {
                message,
                conversation_id,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Failed to generate reply")
                    .with_message(message)
                    .with_session_id(conversation_id.to_string()),
            ),
            ChatApiError::Rejected { status, message } => {
                (status, ErrorResponse::new(message))
            }
            ChatApiError::Internal { public, detail } => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error").with_message(public),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ChatApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_lists_details() {
        let (status, body) = render(ChatApiError::Validation(vec![FieldError::new(
            "message", REQUIRED,
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "message");
        assert_eq!(body["details"][0]["message"], "Required");
    }

    #[tokio::test]
    async fn generation_error_carries_session_id() {
        let id = ConversationId::new();
        let (status, body) = render(ChatApiError::Generation {
            message: "Rate limit exceeded. Please try again in a moment.".to_string(),
            conversation_id: id,
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate reply");
        assert_eq!(body["sessionId"], id.to_string());
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let (status, body) = render(ChatApiError::internal(
            UNEXPECTED_ERROR,
            "Failed to insert message: connection refused",
        ))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], UNEXPECTED_ERROR);
        assert!(!body.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn not_found_and_bad_id() {
        let (status, body) = render(ChatApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Conversation not found"}));

        let (status, body) = render(ChatApiError::InvalidSessionId).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid session ID format");
    }
}
