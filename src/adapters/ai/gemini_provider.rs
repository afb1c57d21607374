//! Gemini Provider - Implementation of AIProvider for Google's generateContent API.
//!
//! Each reply is a single, stateless call: the store preamble, the recent
//! history and the new user message are flattened into one prompt, and the
//! model is asked to answer with a `{"response": "..."}` JSON envelope.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.0-flash")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! Failures are never retried; they surface to the caller as [`AIError`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole, ProviderInfo,
};

/// Fixed store knowledge and tone guidelines sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful support agent for Spur Store, a small e-commerce store. Answer clearly and concisely.

STORE INFORMATION:
- Store Name: Spur Store
- Shipping Policy: Free shipping on orders over $50. Standard shipping (5-7 business days) costs $5.99. Express shipping (2-3 business days) costs $12.99. We ship to USA, Canada, and select international destinations.
- Return/Refund Policy: Returns accepted within 30 days of purchase. Items must be unused and in original packaging. Refunds processed within 5-7 business days after receiving the returned item. Free return shipping on defective items.
- Support Hours: Monday-Friday, 9 AM - 6 PM EST. For urgent matters outside these hours, email support@spurstore.com.
- Payment Methods: We accept all major credit cards, PayPal, and Apple Pay.

GUIDELINES:
- Be friendly, professional, and helpful
- Keep responses concise but complete
- If you don't know something specific about products, admit it and offer to connect with a human agent
- Never make up information about specific products or inventory
- Always be honest about policies";

const RESPONSE_INSTRUCTION: &str =
    "Respond helpfully and concisely. Return your response as JSON with a \"response\" key.";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-2.0-flash").
    pub model: String,
    /// Base URL for the API (default: https://generativelanguage.googleapis.com).
    pub base_url: String,
    /// Optional transport timeout. `None` waits as long as the remote side does.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL (without the key).
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Converts our request to Gemini's wire format.
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let (history, current) = request.split_current();
        let current = current.map(|m| m.content.as_str()).unwrap_or_default();

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(history, current),
                }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let body = Self::to_gemini_request(request);

        self.client
            .post(self.generate_url())
            .query(&[("key", self.config.api_key())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e.without_url()))
                } else {
                    // Strip the URL so the key never reaches logs.
                    AIError::network(e.without_url().to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<String, AIError> {
        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &error_body));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e.without_url())))?;

        extract_reply(gemini_response)
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        tracing::debug!(
            conversation_id = %request.conversation_id,
            model = %self.config.model,
            messages = request.messages.len(),
            "Calling Gemini generateContent"
        );

        let response = self.send_request(&request).await?;
        let content = self.parse_response(response).await.map_err(|err| {
            tracing::debug!(
                conversation_id = %request.conversation_id,
                error = %err,
                "Gemini returned an unusable response"
            );
            err
        })?;

        Ok(CompletionResponse::new(content, &self.config.model))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

// ----- Prompt and response handling -----

/// Flattens history and the new message into the single prompt string.
pub fn build_prompt(history: &[Message], user_message: &str) -> String {
    let mut prompt = String::with_capacity(SYSTEM_PROMPT.len() + user_message.len() + 256);
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push_str("\n\n");

    if !history.is_empty() {
        prompt.push_str("Previous conversation:\n");
        let lines: Vec<String> = history
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    MessageRole::User => "User",
                    MessageRole::Assistant => "Assistant",
                };
                format!("{}: {}", speaker, m.content)
            })
            .collect();
        prompt.push_str(&lines.join("\n"));
        prompt.push_str("\n\n");
    }

    prompt.push_str("User: ");
    prompt.push_str(user_message);
    prompt.push_str("\n\n");
    prompt.push_str(RESPONSE_INSTRUCTION);
    prompt
}

/// Maps a non-success HTTP status to an error.
fn classify_status(status: u16, error_body: &str) -> AIError {
    match status {
        400 => {
            let detail = serde_json::from_str::<GeminiResponse>(error_body)
                .ok()
                .and_then(|r| r.error)
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty());
            AIError::InvalidRequest(detail)
        }
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::RateLimited,
        500..=599 => AIError::Unavailable { status },
        other => AIError::UnexpectedStatus(other),
    }
}

/// Pulls the reply text out of a successful response body.
fn extract_reply(response: GeminiResponse) -> Result<String, AIError> {
    let candidate = response.candidates.and_then(|c| c.into_iter().next());

    let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
    let raw_text = candidate
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.is_empty());

    match raw_text {
        Some(text) => Ok(unwrap_envelope(&text)),
        None if finish_reason.as_deref() == Some("SAFETY") => Err(AIError::content_filtered("SAFETY")),
        None => Err(AIError::EmptyResponse),
    }
}

/// Reads the `response` key from the JSON envelope, falling back to the raw text.
fn unwrap_envelope(raw_text: &str) -> String {
    let envelope = serde_json::from_str::<ReplyEnvelope>(raw_text)
        .ok()
        .and_then(|e| e.response)
        .filter(|r| !r.is_empty());

    match envelope {
        Some(reply) => reply.trim().to_string(),
        None => raw_text.trim().to_string(),
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
            response_mime_type: "application/json",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    response: Option<String>,
}
