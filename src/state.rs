//! Client state: the stores wired to one backend and one session storage

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{RosterBackend, SessionStorage};
use crate::infrastructure::auth::{AuthService, TokenCell};
use crate::store::{AuthStore, EventsStore, MatchStore, OrganizationStore, PlayerStore};

/// Shared stores of a signed-in (or signed-out) client
#[derive(Debug, Clone)]
pub struct ClientState {
    pub auth: Arc<AuthStore>,
    pub organizations: Arc<OrganizationStore>,
    pub events: Arc<EventsStore>,
    pub players: Arc<PlayerStore>,
    pub matches: Arc<MatchStore>,
}

impl ClientState {
    /// Wire the stores together
    ///
    /// `token` must be the cell `backend` reads its bearer token from.
    pub fn new(
        backend: Arc<dyn RosterBackend>,
        storage: Arc<dyn SessionStorage>,
        token: TokenCell,
    ) -> Self {
        let service = Arc::new(AuthService::new(backend.clone(), storage, token));
        let auth = Arc::new(AuthStore::new(service));

        Self {
            organizations: Arc::new(OrganizationStore::new(backend.clone(), auth.clone())),
            events: Arc::new(EventsStore::new(backend.clone())),
            players: Arc::new(PlayerStore::new(backend.clone(), auth.clone())),
            matches: Arc::new(MatchStore::new(backend, auth.clone())),
            auth,
        }
    }

    /// Restore the session and start keeping "my team" in step with it
    pub async fn start(&self) -> JoinHandle<()> {
        self.auth.initialize().await;
        self.organizations.spawn_auth_sync()
    }
}
