//! Single-record stores for player and match screens
//!
//! Both are gated on team membership: without a signed-in user that belongs
//! to a team, `load` leaves the state untouched and returns `None`.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error};

use super::{AuthStore, Observable};
use crate::domain::{DomainError, Match, MatchId, Player, PlayerId, RosterBackend};

#[derive(Debug, Clone, PartialEq)]
pub struct DetailState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

async fn load_into<T, F>(
    auth: &AuthStore,
    state: &Observable<DetailState<T>>,
    kind: &'static str,
    fetch: F,
) -> Result<Option<T>, DomainError>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Future<Output = Result<T, DomainError>>,
{
    if !auth.state().can_view_team_content() {
        debug!(kind, "Skipping load without team membership");
        return Ok(None);
    }

    state.update(|s| {
        s.is_loading = true;
        s.error = None;
    });

    match fetch.await {
        Ok(data) => {
            state.update(|s| {
                s.data = Some(data.clone());
                s.is_loading = false;
            });
            Ok(Some(data))
        }
        Err(e) => {
            error!(kind, error = %e, "Failed to load record");
            state.update(|s| {
                s.data = None;
                s.is_loading = false;
                s.error = Some(e.to_string());
            });
            Err(e)
        }
    }
}

#[derive(Debug)]
pub struct PlayerStore {
    backend: Arc<dyn RosterBackend>,
    auth: Arc<AuthStore>,
    state: Observable<DetailState<Player>>,
}

impl PlayerStore {
    pub fn new(backend: Arc<dyn RosterBackend>, auth: Arc<AuthStore>) -> Self {
        Self {
            backend,
            auth,
            state: Observable::default(),
        }
    }

    pub fn state(&self) -> DetailState<Player> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState<Player>> {
        self.state.subscribe()
    }

    pub async fn load(&self, id: &PlayerId) -> Result<Option<Player>, DomainError> {
        load_into(&self.auth, &self.state, "player", self.backend.get_player(id)).await
    }
}

#[derive(Debug)]
pub struct MatchStore {
    backend: Arc<dyn RosterBackend>,
    auth: Arc<AuthStore>,
    state: Observable<DetailState<Match>>,
}

impl MatchStore {
    pub fn new(backend: Arc<dyn RosterBackend>, auth: Arc<AuthStore>) -> Self {
        Self {
            backend,
            auth,
            state: Observable::default(),
        }
    }

    pub fn state(&self) -> DetailState<Match> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState<Match>> {
        self.state.subscribe()
    }

    pub async fn load(&self, id: &MatchId) -> Result<Option<Match>, DomainError> {
        load_into(&self.auth, &self.state, "match", self.backend.get_match(id)).await
    }
}
