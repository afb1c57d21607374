//! Support Chat server entry point.
//!
//! Loads configuration, connects to PostgreSQL, builds the Gemini client and
//! serves the chat API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use support_chat::adapters::{
    build_router, postgres, ChatAppState, GeminiConfig, GeminiProvider,
    PostgresConversationReader, PostgresConversationRepository,
};
use support_chat::config::{AppConfig, ConfigError, ValidationError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;

    init_tracing(&config);

    let pool = postgres::connect(&config.database).await?;
    tracing::info!(url = %config.database.redacted_url(), "Connected to database");

    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let api_key = config
        .ai
        .gemini_api_key
        .as_ref()
        .ok_or(ConfigError::ValidationFailed(ValidationError::MissingRequired(
            "GEMINI_API_KEY",
        )))?;
    let mut gemini = GeminiConfig::new(api_key.expose_secret().as_str())
        .with_model(config.ai.model.as_str())
        .with_base_url(config.ai.base_url.as_str());
    if let Some(timeout) = config.ai.timeout() {
        gemini = gemini.with_timeout(timeout);
    }
    let ai_provider = Arc::new(GeminiProvider::new(gemini)?);

    let state = ChatAppState::new(
        Arc::new(PostgresConversationRepository::new(pool.clone())),
        Arc::new(PostgresConversationReader::new(pool)),
        ai_provider,
    );
    let router = build_router(state, config.server.body_limit_bytes);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, model = %config.ai.model, "Server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
