//! Integration tests for the chat HTTP API.
//!
//! These tests drive the full router (middleware included) over the
//! in-memory store and the mock reply generator:
//! 1. Turn orchestration (new/unknown/existing sessions, failures)
//! 2. Listing and history ordering
//! 3. Validation and error envelopes

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use support_chat::adapters::ai::{MockAIProvider, MockError};
use support_chat::adapters::http::{build_router, ChatAppState, DEFAULT_BODY_LIMIT};
use support_chat::adapters::storage::InMemoryConversationStore;
use support_chat::domain::foundation::ConversationId;
use support_chat::ports::ConversationReader;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    store: Arc<InMemoryConversationStore>,
    ai: Arc<MockAIProvider>,
}

impl TestApp {
    fn new(ai: MockAIProvider) -> Self {
        let store = Arc::new(InMemoryConversationStore::new());
        let ai = Arc::new(ai);
        let state = ChatAppState::new(store.clone(), store.clone(), ai.clone());
        Self {
            router: build_router(state, DEFAULT_BODY_LIMIT),
            store,
            ai,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post_message(&self, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri("/chat/message")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

fn session_of(body: &Value) -> String {
    body["sessionId"].as_str().unwrap().to_string()
}

// =============================================================================
// POST /chat/message
// =============================================================================

#[tokio::test]
async fn new_session_creates_exactly_one_conversation() {
    let app = TestApp::new(MockAIProvider::new().with_response("We ship to Canada."));

    let (status, body) = app.post_message(json!({"message": "Do you ship to Canada?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "We ship to Canada.");
    let session: ConversationId = session_of(&body).parse().unwrap();
    assert_eq!(app.store.conversation_count().await, 1);
    assert_eq!(app.store.get_messages(&session).await.unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_session_returns_404_and_creates_nothing() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .post_message(json!({
            "message": "Hello?",
            "sessionId": ConversationId::new().to_string(),
        }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Conversation not found"}));
    assert_eq!(app.store.conversation_count().await, 0);
    assert_eq!(app.store.message_count().await, 0);
    assert_eq!(app.ai.call_count(), 0);
}

#[tokio::test]
async fn follow_up_reuses_session_and_sends_history() {
    let app = TestApp::new(
        MockAIProvider::new()
            .with_response("Returns are accepted within 30 days.")
            .with_response("Refunds take 5-7 business days."),
    );

    let (_, first) = app.post_message(json!({"message": "What is your return policy?"})).await;
    let session = session_of(&first);

    let (status, second) = app
        .post_message(json!({"message": "And refunds?", "sessionId": session}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session_of(&second), session);
    assert_eq!(app.store.conversation_count().await, 1);

    let request = app.ai.last_call().unwrap();
    let (history, current) = request.split_current();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "What is your return policy?");
    assert_eq!(current.unwrap().content, "And refunds?");
}

#[tokio::test]
async fn generation_failure_keeps_user_message() {
    let app = TestApp::new(MockAIProvider::new().with_error(MockError::RateLimited));

    let (status, body) = app.post_message(json!({"message": "Is anyone there?"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate reply");
    assert_eq!(
        body["message"],
        "Rate limit exceeded. Please try again in a moment."
    );

    let session = session_of(&body);
    let (status, history) = app.get(&format!("/chat/history/{}", session)).await;
    assert_eq!(status, StatusCode::OK);
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "user");
    assert_eq!(messages[0]["text"], "Is anyone there?");
}

#[tokio::test]
async fn retry_after_failure_continues_same_conversation() {
    let app = TestApp::new(
        MockAIProvider::new()
            .with_error(MockError::Unavailable { status: 503 })
            .with_response("Sorry for the wait!"),
    );

    let (_, failed) = app.post_message(json!({"message": "Hello"})).await;
    assert_eq!(
        failed["message"],
        "AI service temporarily unavailable. Please try again."
    );
    let session = session_of(&failed);

    let (status, body) = app
        .post_message(json!({"message": "Hello again", "sessionId": session}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Sorry for the wait!");

    let (_, history) = app.get(&format!("/chat/history/{}", session)).await;
    let senders: Vec<&str> = history["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["sender"].as_str().unwrap())
        .collect();
    assert_eq!(senders, vec!["user", "user", "ai"]);
}

#[tokio::test]
async fn validation_errors_have_field_details() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app.post_message(json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["details"],
        json!([{"field": "message", "message": "Required"}])
    );

    let (_, body) = app.post_message(json!({"message": ""})).await;
    assert_eq!(body["details"][0]["message"], "Message cannot be empty");

    let (_, body) = app.post_message(json!({"message": "x".repeat(5001)})).await;
    assert_eq!(
        body["details"][0]["message"],
        "Message too long (max 5000 characters)"
    );

    let (_, body) = app
        .post_message(json!({"message": "hi", "sessionId": "not-a-uuid"}))
        .await;
    assert_eq!(
        body["details"],
        json!([{"field": "sessionId", "message": "Invalid uuid"}])
    );

    assert_eq!(app.store.conversation_count().await, 0);
    assert_eq!(app.ai.call_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/chat/message")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["details"],
        json!([{"field": "", "message": "Expected object"}])
    );
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::new(MockAIProvider::new());
    let huge = json!({"message": "x".repeat(DEFAULT_BODY_LIMIT + 1)});

    let (status, _) = app.post_message(huge).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.store.conversation_count().await, 0);
}

// =============================================================================
// GET /chat/history/:session_id
// =============================================================================

#[tokio::test]
async fn history_round_trips_text_verbatim_in_order() {
    let app = TestApp::new(MockAIProvider::new().with_response("  Noted!  "));
    let text = "  Order #42 «naïve» café 🚚\nsecond line ";

    let (_, body) = app.post_message(json!({"message": text})).await;
    let session = session_of(&body);

    let (status, history) = app.get(&format!("/chat/history/{}", session)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["sessionId"], session);

    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["text"], text);
    assert_eq!(messages[0]["sender"], "user");
    assert_eq!(messages[1]["sender"], "ai");
    assert!(
        messages[0]["timestamp"].as_str().unwrap() <= messages[1]["timestamp"].as_str().unwrap()
    );
}

#[tokio::test]
async fn history_rejects_malformed_id() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app.get("/chat/history/12345").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid session ID format"}));
}

#[tokio::test]
async fn history_rejects_non_utf8_id_with_json_envelope() {
    let app = TestApp::new(MockAIProvider::new());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/chat/history/%FF")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Invalid session ID format"}));
}

#[tokio::test]
async fn history_of_unknown_conversation_is_404() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .get(&format!("/chat/history/{}", ConversationId::new()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Conversation not found"}));
}

// =============================================================================
// GET /chat/conversations
// =============================================================================

#[tokio::test]
async fn conversations_are_capped_and_ordered_by_recency() {
    let app = TestApp::new(MockAIProvider::new());

    let mut sessions = Vec::new();
    for i in 0..22 {
        let (_, body) = app.post_message(json!({"message": format!("question {}", i)})).await;
        sessions.push(session_of(&body));
    }
    // Bring the oldest conversation back to the top.
    app.post_message(json!({"message": "one more", "sessionId": sessions[0]}))
        .await;

    let (status, body) = app.get("/chat/conversations").await;
    assert_eq!(status, StatusCode::OK);

    let conversations = body["conversations"].as_array().unwrap();
    assert_eq!(conversations.len(), 20);
    assert_eq!(conversations[0]["id"], sessions[0]);
    assert_eq!(conversations[0]["preview"], "question 0");

    let updated: Vec<&str> = conversations
        .iter()
        .map(|c| c["updatedAt"].as_str().unwrap())
        .collect();
    for pair in updated.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn preview_is_truncated_to_fifty_chars() {
    let app = TestApp::new(MockAIProvider::new());
    app.post_message(json!({"message": "a".repeat(120)})).await;

    let (_, body) = app.get("/chat/conversations").await;

    let preview = body["conversations"][0]["preview"].as_str().unwrap();
    assert_eq!(preview.chars().count(), 50);
}

// =============================================================================
// Misc routes
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app.get("/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = TestApp::new(MockAIProvider::new());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://shop.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
