//! Application configuration module
//!
//! Configuration is read from environment variables (and an optional `.env`
//! file) with the `SUPPORT_CHAT` prefix; nested values use `__` separators.
//!
//! # Example
//!
//! ```no_run
//! use support_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, environment, logging, body limit)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Reply generator configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `SUPPORT_CHAT__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `SUPPORT_CHAT__DATABASE__URL=...` -> `database.url = ...`
    /// - `SUPPORT_CHAT__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SUPPORT_CHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("SUPPORT_CHAT__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("SUPPORT_CHAT__AI__GEMINI_API_KEY", "AIza-test");
    }

    fn clear_env() {
        env::remove_var("SUPPORT_CHAT__DATABASE__URL");
        env::remove_var("SUPPORT_CHAT__AI__GEMINI_API_KEY");
        env::remove_var("SUPPORT_CHAT__AI__MODEL");
        env::remove_var("SUPPORT_CHAT__SERVER__PORT");
        env::remove_var("SUPPORT_CHAT__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(
            config.ai.gemini_api_key.as_ref().unwrap().expose_secret(),
            "AIza-test"
        );
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SUPPORT_CHAT__DATABASE__URL", "postgresql://test@localhost/test");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("GEMINI_API_KEY"))
        );
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.ai.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SUPPORT_CHAT__SERVER__PORT", "8081");
        env::set_var("SUPPORT_CHAT__SERVER__ENVIRONMENT", "production");
        env::set_var("SUPPORT_CHAT__AI__MODEL", "gemini-1.5-flash");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8081);
        assert!(config.is_production());
        assert_eq!(config.ai.model, "gemini-1.5-flash");
    }
}
