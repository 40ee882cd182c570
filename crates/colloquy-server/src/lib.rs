//! Colloquy Server
//!
//! HTTP surface of the Q&A service: user accounts and sessions, topics,
//! questions, answers and comments, plus the follow/like/dislike/collect
//! toggles backed by the relationship engine.

#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod handlers;

use colloquy_store::{SqliteStore, StoreError};
use config::ServerConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Open the store and build the application state
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let store = SqliteStore::new(&config.database_path)?;
    Ok(AppState::new(config, store))
}

/// Start the HTTP server
///
/// Log filtering follows `RUST_LOG`, defaulting to `info`.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    info!("Starting Colloquy server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!("Token expiry: {} seconds", config.token_expiry_secs);

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_from_test_config() {
        let config = ServerConfig::default_test_config();
        let state = build_state(&config).unwrap();
        assert_eq!(state.default_page_size, config.default_page_size);
    }

    #[test]
    fn test_unopenable_database_is_store_error() {
        let mut config = ServerConfig::default_test_config();
        config.database_path = "/nonexistent-dir/colloquy.db".to_string();
        assert!(matches!(build_state(&config), Err(ServerError::Store(_))));
    }
}
