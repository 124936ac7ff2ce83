use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error};

use super::Observable;
use crate::domain::{DomainError, Game, MatchStatus, OrganizationId, RosterBackend};

/// Number of matches requested per schedule list
pub const SCHEDULE_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsState {
    pub upcoming_games: Vec<Game>,
    pub past_games: Vec<Game>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Upcoming and past games for a team
#[derive(Debug)]
pub struct EventsStore {
    backend: Arc<dyn RosterBackend>,
    state: Observable<EventsState>,
}

impl EventsStore {
    pub fn new(backend: Arc<dyn RosterBackend>) -> Self {
        Self {
            backend,
            state: Observable::default(),
        }
    }

    pub fn state(&self) -> EventsState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<EventsState> {
        self.state.subscribe()
    }

    pub async fn fetch_upcoming_games(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Game>, DomainError> {
        let games = self.fetch_games(organization_id, MatchStatus::Active).await?;
        self.state.update(|s| s.upcoming_games = games.clone());
        Ok(games)
    }

    pub async fn fetch_past_games(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Game>, DomainError> {
        let games = self.fetch_games(organization_id, MatchStatus::Inactive).await?;
        self.state.update(|s| s.past_games = games.clone());
        Ok(games)
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    async fn fetch_games(
        &self,
        organization_id: &OrganizationId,
        status: MatchStatus,
    ) -> Result<Vec<Game>, DomainError> {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.backend.list_matches(status, SCHEDULE_LIMIT).await {
            Ok(matches) => {
                debug!(%status, count = matches.len(), "Fetched games");
                self.state.update(|s| s.is_loading = false);
                Ok(matches
                    .iter()
                    .map(|m| m.to_game(organization_id))
                    .collect())
            }
            Err(e) => {
                error!(%status, error = %e, "Failed to fetch games");
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backend::mock::MockRosterBackend;
    use crate::domain::{Match, MatchId};

    fn game_match(id: &str, status: MatchStatus) -> Match {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "status": status.as_str(),
            "date": "2026-05-01T18:00:00Z",
            "team1Id": "org-1",
            "team2Id": "org-9",
            "location": "North Park",
            "team1": { "id": "org-1", "name": "Rovers FC" },
            "team2": { "id": "org-9", "name": "City" },
        }))
        .unwrap()
    }

    fn create_store(backend: MockRosterBackend) -> EventsStore {
        EventsStore::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn test_upcoming_and_past_games_are_split() {
        let store = create_store(
            MockRosterBackend::new()
                .with_match(game_match("m-1", MatchStatus::Active))
                .with_match(game_match("m-2", MatchStatus::Inactive))
                .with_match(game_match("m-3", MatchStatus::Active)),
        );
        let org = OrganizationId::new("org-1").unwrap();

        let upcoming = store.fetch_upcoming_games(&org).await.unwrap();
        let past = store.fetch_past_games(&org).await.unwrap();

        assert_eq!(upcoming.len(), 2);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].id, MatchId::new("m-2").unwrap());

        let state = store.state();
        assert_eq!(state.upcoming_games, upcoming);
        assert_eq!(state.past_games, past);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_failure_is_recorded() {
        let store = create_store(
            MockRosterBackend::new()
                .with_error("list_matches", DomainError::http(502, "bad gateway")),
        );
        let org = OrganizationId::new("org-1").unwrap();

        let result = store.fetch_upcoming_games(&org).await;

        tokio_test::assert_err!(result);
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("HTTP 502: bad gateway"));
        assert!(state.upcoming_games.is_empty());

        store.clear_error();
        assert!(store.state().error.is_none());
    }
}
