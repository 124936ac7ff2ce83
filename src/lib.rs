//! Roster client
//!
//! Headless client core for a team roster service:
//! - REST backend access with bearer-token sessions
//! - Persisted login sessions
//! - Observable stores that keep the user's team consistent with their account

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use state::ClientState;

use std::sync::Arc;

use infrastructure::auth::TokenCell;
use infrastructure::backend::RestRosterBackend;
use infrastructure::http::HttpClient;
use infrastructure::session::FileSessionStorage;
use tracing::info;

/// Create the client state with default configuration
pub fn create_client_state() -> anyhow::Result<ClientState> {
    create_client_state_with_config(&AppConfig::default())
}

/// Create the client state with custom configuration
pub fn create_client_state_with_config(config: &AppConfig) -> anyhow::Result<ClientState> {
    let client = HttpClient::with_timeout(config.api.timeout())?;
    let token = TokenCell::new();
    let backend = Arc::new(RestRosterBackend::new(
        client,
        config.api.base_url.clone(),
        token.clone(),
    ));
    let storage = Arc::new(FileSessionStorage::new(config.session.path.clone()));

    info!(
        base_url = %config.api.base_url,
        session = %config.session.path.display(),
        "Client state created"
    );

    Ok(ClientState::new(backend, storage, token))
}
