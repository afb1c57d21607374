//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini generateContent API
//! - `MockAIProvider` - Configurable mock for testing

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{build_prompt, GeminiConfig, GeminiProvider, SYSTEM_PROMPT};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
