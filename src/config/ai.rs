//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Gemini provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Gemini API key
    pub gemini_api_key: Option<Secret<String>>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; unset leaves the transport default
    pub timeout_secs: Option<u64>,
}

impl AiConfig {
    /// Get timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check if a Gemini key is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_gemini() {
            return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidAiBaseUrl);
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 || secs > 300 {
                return Err(ValidationError::InvalidAiTimeout);
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> AiConfig {
        AiConfig {
            gemini_api_key: Some(Secret::new(key.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: Some(60),
            ..with_key("k")
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_validation_missing_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("GEMINI_API_KEY"))
        );
        assert!(with_key("").validate().is_err());
    }

    #[test]
    fn test_validation_bad_base_url() {
        let config = AiConfig {
            base_url: "ftp://example.com".to_string(),
            ..with_key("k")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAiBaseUrl));
    }

    #[test]
    fn test_validation_bad_timeout() {
        let config = AiConfig {
            timeout_secs: Some(0),
            ..with_key("k")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAiTimeout));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(with_key("AIza-test").validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = with_key("AIza-very-secret");
        assert!(!format!("{:?}", config).contains("AIza-very-secret"));
    }
}
