//! Organization store
//!
//! Caches the signed-in user's team ("my team") next to the browsable list of
//! teams, and keeps the cached team consistent with the team reference held
//! by the auth store:
//!
//! - a reference that differs from the cached team triggers a fetch
//! - a missing reference (or a signed-out user) clears the cache
//! - a reference the backend no longer resolves is cleared silently
//!
//! Every fetch of "my team" captures a sequence number. Its result is only
//! applied if no newer fetch or clear started in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{AuthStore, Observable};
use crate::domain::{
    DomainError, Organization, OrganizationId, OrganizationPage, OrganizationQuery, Pagination,
    RosterBackend, SubscriptionStatus, User,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationState {
    pub user_organization: Option<Organization>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_initialized: bool,
    pub organizations: Vec<Organization>,
    pub pagination: Pagination,
    pub search: Option<String>,
    pub is_loading_organizations: bool,
    pub organizations_error: Option<String>,
}

impl OrganizationState {
    pub fn user_organization_id(&self) -> Option<&OrganizationId> {
        self.user_organization.as_ref().map(|org| org.id())
    }
}

#[derive(Debug)]
pub struct OrganizationStore {
    backend: Arc<dyn RosterBackend>,
    auth: Arc<AuthStore>,
    state: Observable<OrganizationState>,
    sequence: AtomicU64,
    list_sequence: AtomicU64,
    pending: Mutex<Option<(u64, OrganizationId)>>,
}

impl OrganizationStore {
    pub fn new(backend: Arc<dyn RosterBackend>, auth: Arc<AuthStore>) -> Self {
        Self {
            backend,
            auth,
            state: Observable::default(),
            sequence: AtomicU64::new(0),
            list_sequence: AtomicU64::new(0),
            pending: Mutex::new(None),
        }
    }

    pub fn state(&self) -> OrganizationState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<OrganizationState> {
        self.state.subscribe()
    }

    /// Fetch "my team" for the signed-in user's current team reference
    ///
    /// Always hits the backend when a reference is present, so a retry picks
    /// up roster changes and notices a team that no longer exists.
    pub async fn fetch_user_organization(&self) -> Result<Option<Organization>, DomainError> {
        let reference = self.auth.user().and_then(|u| u.organization_id().cloned());

        let organization = match reference {
            Some(id) => self.load_user_organization(id).await?,
            None => {
                self.sync_with_user(None).await?;
                None
            }
        };
        self.state.update(|s| s.is_initialized = true);

        Ok(organization)
    }

    /// Reconcile the cached team with one snapshot of the signed-in user
    pub async fn sync_with_user(&self, user: Option<&User>) -> Result<(), DomainError> {
        let reference = user.and_then(|u| u.organization_id()).cloned();
        let cached = self.state.read(|s| s.user_organization_id().cloned());

        match reference {
            Some(id) if cached.as_ref() == Some(&id) => Ok(()),
            Some(id) if self.is_pending(&id) => {
                debug!(organization_id = %id, "Fetch already in flight");
                Ok(())
            }
            Some(id) => self.load_user_organization(id).await.map(|_| ()),
            None => {
                if cached.is_some() || self.has_pending() {
                    self.clear_user_organization();
                }
                Ok(())
            }
        }
    }

    /// Keep this store in step with the auth store until either is dropped
    pub fn spawn_auth_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let mut rx = self.auth.subscribe();

        tokio::spawn(async move {
            loop {
                let user = rx.borrow_and_update().user.clone();
                let Some(store) = weak.upgrade() else {
                    break;
                };

                if let Err(e) = store.sync_with_user(user.as_ref()).await {
                    debug!(error = %e, "Auth sync fetch failed");
                }
                drop(store);

                if rx.changed().await.is_err() {
                    break;
                }
            }
            debug!("Auth sync stopped");
        })
    }

    /// Fetch one page of the browsable team list
    pub async fn fetch_organizations(
        &self,
        query: OrganizationQuery,
    ) -> Result<OrganizationPage, DomainError> {
        let seq = self.list_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.update(|s| {
            s.is_loading_organizations = true;
            s.organizations_error = None;
            s.search = query.search.clone();
        });

        let result = match query.validate() {
            Ok(()) => self.backend.list_organizations(&query).await,
            Err(e) => Err(DomainError::validation(e.to_string())),
        };

        let is_current = || self.list_sequence.load(Ordering::SeqCst) == seq;
        match &result {
            Ok(page) => {
                debug!(
                    count = page.organizations.len(),
                    page = page.pagination.page,
                    "Fetched organizations"
                );
                self.state.update(|s| {
                    if is_current() {
                        s.organizations = page.organizations.clone();
                        s.pagination = page.pagination;
                        s.is_loading_organizations = false;
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch organizations");
                self.state.update(|s| {
                    if is_current() {
                        s.is_loading_organizations = false;
                        s.organizations_error = Some(e.to_string());
                    }
                });
            }
        }

        result
    }

    /// Fetch "my team"; when there is none, fetch the first page of teams to join
    pub async fn load_teams(&self) -> Result<(), DomainError> {
        self.fetch_user_organization().await?;

        if self.state.read(|s| s.user_organization.is_some()) {
            self.refresh_and_clear_available();
            return Ok(());
        }

        let search = self.state.read(|s| s.search.clone());
        let mut query = OrganizationQuery::new();
        if let Some(search) = search {
            query = query.with_search(search);
        }
        self.fetch_organizations(query).await.map(|_| ())
    }

    /// Drop the browsable list once the user belongs to a team
    pub fn refresh_and_clear_available(&self) {
        self.state.update(|s| {
            if s.user_organization.is_some() {
                s.organizations.clear();
                s.pagination = Pagination::default();
            }
        });
    }

    /// Join a team and verify the backend recorded it
    pub async fn subscribe_to_team(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Organization, DomainError> {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.try_subscribe(organization_id).await;
        self.finish(&result);

        let organization = result?;
        info!(organization_id = %organization_id, "Subscribed to team");
        Ok(organization)
    }

    /// Leave the current team and refresh the list of teams to join
    pub async fn unsubscribe_from_team(&self) -> Result<(), DomainError> {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.try_unsubscribe().await;
        self.finish(&result);
        result?;

        info!("Unsubscribed from team");
        if let Err(e) = self.fetch_organizations(OrganizationQuery::new()).await {
            warn!(error = %e, "Team list refresh after unsubscribe failed");
        }
        Ok(())
    }

    pub async fn check_subscription_status(&self) -> Result<SubscriptionStatus, DomainError> {
        let user = self.require_user()?;
        let status = self.backend.subscription_status(user.id()).await?;

        if status.organization_id.as_ref() != user.organization_id() {
            warn!(
                local = ?user.organization_id(),
                remote = ?status.organization_id,
                "Local team reference differs from backend"
            );
        }
        Ok(status)
    }

    pub async fn check_join_eligibility(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<bool, DomainError> {
        let user = self.require_user()?;
        self.backend.join_eligibility(user.id(), organization_id).await
    }

    pub fn clear_error(&self) {
        self.state.update(|s| {
            s.error = None;
            s.organizations_error = None;
        });
    }

    async fn try_subscribe(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Organization, DomainError> {
        let user = self.require_user()?;

        self.backend.subscribe(user.id(), organization_id).await?;
        self.auth
            .set_team_reference(Some(organization_id.clone()))
            .await?;

        let remote = self.backend.get_user(user.id()).await?;
        if remote.organization_id() != Some(organization_id) {
            // Local state follows the backend so the two stop disagreeing.
            if let Err(e) = self
                .auth
                .set_team_reference(remote.organization_id().cloned())
                .await
            {
                warn!(error = %e, "Failed to roll back team reference");
            }
            return Err(DomainError::consistency(format!(
                "Backend did not record subscription to team '{}'",
                organization_id
            )));
        }

        self.auth.force_reload_user().await?;
        let local = self.auth.state().team_reference().cloned();
        if local.as_ref() != Some(organization_id) {
            return Err(DomainError::consistency(format!(
                "Stored team reference does not match team '{}' after subscribing",
                organization_id
            )));
        }

        let organization = self
            .load_user_organization(organization_id.clone())
            .await?
            .ok_or_else(|| {
                DomainError::consistency(format!(
                    "Team '{}' was not loaded after subscribing",
                    organization_id
                ))
            })?;
        self.refresh_and_clear_available();

        Ok(organization)
    }

    async fn try_unsubscribe(&self) -> Result<(), DomainError> {
        let user = self.require_user()?;

        self.backend.unsubscribe(user.id()).await?;
        self.clear_user_organization();
        self.auth.set_team_reference(None).await
    }

    fn finish<T>(&self, result: &Result<T, DomainError>) {
        let error = result.as_ref().err().map(|e| e.to_string());
        if let Some(message) = &error {
            error!(error = %message, "Team operation failed");
        }
        self.state.update(|s| {
            s.is_loading = false;
            s.error = error;
        });
    }

    /// Fetch one team into the "my team" slot
    ///
    /// Returns the fetched team even when a newer fetch superseded it, and
    /// `None` when the team no longer exists.
    async fn load_user_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, DomainError> {
        let seq = self.begin_fetch(&id);
        debug!(organization_id = %id, seq, "Fetching user organization");

        let result = self.backend.get_organization(&id).await;
        self.end_fetch(seq);

        match result {
            Ok(organization) => {
                let applied = self.apply_if_current(seq, |s| {
                    s.user_organization = Some(organization.clone());
                    s.is_loading = false;
                    s.error = None;
                    s.is_initialized = true;
                });
                if !applied {
                    debug!(organization_id = %id, seq, "Discarded stale organization fetch");
                }
                Ok(Some(organization))
            }
            Err(e) if e.is_not_found() => {
                if !self.is_current(seq) {
                    debug!(organization_id = %id, seq, "Discarded stale not-found result");
                    return Ok(None);
                }

                warn!(organization_id = %id, "Team reference no longer resolves, clearing it");
                self.clear_user_organization();
                self.state.update(|s| s.is_initialized = true);

                if self.auth.state().team_reference() == Some(&id) {
                    if let Err(e) = self.auth.set_team_reference(None).await {
                        warn!(error = %e, "Failed to persist cleared team reference");
                    }
                }
                Ok(None)
            }
            Err(e) => {
                let message = e.to_string();
                let applied = self.apply_if_current(seq, |s| {
                    s.is_loading = false;
                    s.error = Some(message);
                    s.is_initialized = true;
                });
                if applied {
                    error!(organization_id = %id, error = %e, "Failed to fetch user organization");
                    Err(e)
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn clear_user_organization(&self) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, "Clearing user organization");

        if let Ok(mut pending) = self.pending.lock() {
            *pending = None;
        }
        self.state.update(|s| {
            s.user_organization = None;
            s.is_loading = false;
        });
    }

    fn begin_fetch(&self, id: &OrganizationId) -> u64 {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some((seq, id.clone()));
        }
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
        seq
    }

    fn end_fetch(&self, seq: u64) {
        if let Ok(mut pending) = self.pending.lock() {
            if pending.as_ref().is_some_and(|(current, _)| *current == seq) {
                *pending = None;
            }
        }
    }

    fn apply_if_current(&self, seq: u64, f: impl FnOnce(&mut OrganizationState)) -> bool {
        let mut applied = false;
        self.state.update(|s| {
            if self.is_current(seq) {
                f(s);
                applied = true;
            }
        });
        applied
    }

    fn is_current(&self, seq: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == seq
    }

    fn is_pending(&self, id: &OrganizationId) -> bool {
        self.pending
            .lock()
            .map(|pending| pending.as_ref().is_some_and(|(_, pending_id)| pending_id == id))
            .unwrap_or(false)
    }

    fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|pending| pending.is_some())
            .unwrap_or(false)
    }

    fn require_user(&self) -> Result<User, DomainError> {
        self.auth
            .user()
            .ok_or_else(|| DomainError::unauthenticated("Sign in to manage team membership"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures::future::join;

    use crate::domain::backend::mock::MockRosterBackend;
    use crate::domain::{LoginCredentials, UserId};
    use crate::infrastructure::auth::{AuthService, TokenCell};
    use crate::infrastructure::session::InMemorySessionStorage;

    fn org_id(id: &str) -> OrganizationId {
        OrganizationId::new(id).unwrap()
    }

    fn organization(id: &str, name: &str) -> Organization {
        Organization::new(org_id(id), name)
    }

    fn user(team: Option<&str>) -> User {
        let user = User::new(UserId::new("user-1").unwrap(), "Ana", "Lopez", "ana@example.com");
        match team {
            Some(team) => user.with_organization(org_id(team)),
            None => user,
        }
    }

    fn backend(team: Option<&str>) -> MockRosterBackend {
        MockRosterBackend::new()
            .with_user(user(team), "token-1")
            .with_organization(organization("org-1", "Rovers FC"))
            .with_organization(organization("org-2", "United"))
            .with_organization(organization("org-3", "Athletic Club"))
    }

    async fn signed_in(
        backend: MockRosterBackend,
    ) -> (OrganizationStore, Arc<AuthStore>, Arc<MockRosterBackend>) {
        let backend = Arc::new(backend);
        let service = AuthService::new(
            backend.clone(),
            Arc::new(InMemorySessionStorage::new()),
            TokenCell::new(),
        );
        let auth = Arc::new(AuthStore::new(Arc::new(service)));
        auth.login(&LoginCredentials::new("ana@example.com", "secret"))
            .await
            .unwrap();

        let store = OrganizationStore::new(backend.clone(), auth.clone());
        (store, auth, backend)
    }

    async fn wait_for(
        rx: &mut watch::Receiver<OrganizationState>,
        predicate: impl Fn(&OrganizationState) -> bool,
    ) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if predicate(&rx.borrow_and_update()) {
                    return;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("state never reached expected condition");
    }

    #[tokio::test]
    async fn test_fetch_user_organization_matches_reference() {
        let (store, _, _) = signed_in(backend(Some("org-1"))).await;

        let org = store.fetch_user_organization().await.unwrap().unwrap();

        assert_eq!(org.id(), &org_id("org-1"));
        let state = store.state();
        assert!(state.is_initialized);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_without_reference_clears_cache() {
        let (store, auth, _) = signed_in(backend(Some("org-1"))).await;
        store.fetch_user_organization().await.unwrap();

        auth.set_team_reference(None).await.unwrap();
        let org = store.fetch_user_organization().await.unwrap();

        assert!(org.is_none());
        assert!(store.state().user_organization.is_none());
    }

    #[tokio::test]
    async fn test_sync_skips_fetch_when_consistent() {
        let (store, auth, backend) = signed_in(backend(Some("org-1"))).await;
        store.fetch_user_organization().await.unwrap();

        store.sync_with_user(auth.user().as_ref()).await.unwrap();
        store.sync_with_user(auth.user().as_ref()).await.unwrap();

        assert_eq!(backend.organization_fetches(), 1);
    }

    #[tokio::test]
    async fn test_sync_with_signed_out_user_clears_cache() {
        let (store, _, _) = signed_in(backend(Some("org-1"))).await;
        store.fetch_user_organization().await.unwrap();

        store.sync_with_user(None).await.unwrap();

        assert!(store.state().user_organization.is_none());
    }

    #[tokio::test]
    async fn test_not_found_self_heals_silently() {
        let (store, auth, backend) = signed_in(backend(Some("org-1"))).await;
        backend.remove_organization("org-1");

        let org = store.fetch_user_organization().await.unwrap();

        assert!(org.is_none());
        assert!(auth.state().team_reference().is_none());
        let state = store.state();
        assert!(state.user_organization.is_none());
        assert!(state.error.is_none());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_refetch_notices_deleted_team() {
        let (store, auth, backend) = signed_in(backend(Some("org-1"))).await;
        store.fetch_user_organization().await.unwrap().unwrap();

        backend.remove_organization("org-1");
        let org = store.fetch_user_organization().await.unwrap();

        assert!(org.is_none());
        assert_eq!(backend.organization_fetches(), 2);
        assert!(auth.state().team_reference().is_none());
        assert!(store.state().user_organization.is_none());
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_is_recorded() {
        let (store, auth, _) = signed_in(
            backend(Some("org-1")).with_error("get_organization", DomainError::http(500, "boom")),
        )
        .await;

        let result = store.fetch_user_organization().await;

        assert_eq!(result.unwrap_err(), DomainError::http(500, "boom"));
        assert_eq!(store.state().error.as_deref(), Some("HTTP 500: boom"));
        assert_eq!(auth.state().team_reference(), Some(&org_id("org-1")));

        store.clear_error();
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_stale_fetch_never_overwrites_newer() {
        let (store, _, _) = signed_in(
            backend(None).with_delay("org-1", Duration::from_millis(100)),
        )
        .await;

        let slow = user(Some("org-1"));
        let fast = user(Some("org-2"));
        let (first, second) = join(
            store.sync_with_user(Some(&slow)),
            store.sync_with_user(Some(&fast)),
        )
        .await;
        first.unwrap();
        second.unwrap();

        let state = store.state();
        assert_eq!(state.user_organization_id(), Some(&org_id("org-2")));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight_fetch() {
        let (store, _, _) = signed_in(
            backend(None).with_delay("org-1", Duration::from_millis(100)),
        )
        .await;

        let slow = user(Some("org-1"));
        let (first, second) = join(store.sync_with_user(Some(&slow)), async {
            tokio::task::yield_now().await;
            store.sync_with_user(None).await
        })
        .await;
        first.unwrap();
        second.unwrap();

        assert!(store.state().user_organization.is_none());
    }

    #[tokio::test]
    async fn test_subscribe_to_team() {
        let (store, auth, backend) = signed_in(backend(None)).await;
        store.fetch_organizations(OrganizationQuery::new()).await.unwrap();

        let org = store.subscribe_to_team(&org_id("org-2")).await.unwrap();

        assert_eq!(org.id(), &org_id("org-2"));
        assert_eq!(auth.state().team_reference(), Some(&org_id("org-2")));
        assert_eq!(
            backend.server_user("user-1").unwrap().organization_id(),
            Some(&org_id("org-2"))
        );
        let state = store.state();
        assert_eq!(state.user_organization_id(), Some(&org_id("org-2")));
        assert!(state.organizations.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_subscribe_returns_team_when_newer_fetch_wins() {
        let (store, _, _) = signed_in(
            backend(None).with_delay("org-2", Duration::from_millis(100)),
        )
        .await;

        let other = user(Some("org-1"));
        let (subscribed, synced) = join(store.subscribe_to_team(&org_id("org-2")), async {
            tokio::task::yield_now().await;
            store.sync_with_user(Some(&other)).await
        })
        .await;
        synced.unwrap();

        let org = subscribed.unwrap();
        assert_eq!(org.id(), &org_id("org-2"));
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_subscribe_detects_unrecorded_subscription() {
        let (store, auth, _) = signed_in(backend(None).ignoring_subscriptions()).await;

        let result = store.subscribe_to_team(&org_id("org-2")).await;

        assert!(matches!(result, Err(DomainError::Consistency { .. })));
        assert!(store.state().error.is_some());
        assert!(auth.state().team_reference().is_none());
        assert!(store.state().user_organization.is_none());
    }

    #[tokio::test]
    async fn test_subscribe_backend_failure_keeps_reference() {
        let (store, auth, _) = signed_in(backend(None)).await;

        let result = store.subscribe_to_team(&org_id("missing")).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(auth.state().team_reference().is_none());
        assert_eq!(
            store.state().error.as_deref(),
            Some("Not found: Organization 'missing' not found")
        );
    }

    #[tokio::test]
    async fn test_subscribe_requires_user() {
        let backend = Arc::new(backend(None));
        let service = AuthService::new(
            backend.clone(),
            Arc::new(InMemorySessionStorage::new()),
            TokenCell::new(),
        );
        let store = OrganizationStore::new(backend, Arc::new(AuthStore::new(Arc::new(service))));

        let result = store.subscribe_to_team(&org_id("org-1")).await;

        assert!(matches!(result, Err(DomainError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_unsubscribe_clears_reference_and_refreshes_list() {
        let (store, auth, backend) = signed_in(backend(Some("org-1"))).await;
        store.load_teams().await.unwrap();
        let fetches_before = backend.list_fetches();

        store.unsubscribe_from_team().await.unwrap();

        assert!(auth.state().team_reference().is_none());
        assert!(backend.server_user("user-1").unwrap().organization_id().is_none());
        let state = store.state();
        assert!(state.user_organization.is_none());
        assert_eq!(state.organizations.len(), 3);
        assert_eq!(backend.list_fetches(), fetches_before + 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_failure_is_recorded() {
        let (store, auth, _) = signed_in(
            backend(Some("org-1")).with_error("unsubscribe", DomainError::http(503, "down")),
        )
        .await;
        store.fetch_user_organization().await.unwrap();

        let result = store.unsubscribe_from_team().await;

        assert!(result.is_err());
        assert_eq!(store.state().error.as_deref(), Some("HTTP 503: down"));
        assert_eq!(auth.state().team_reference(), Some(&org_id("org-1")));
        assert!(store.state().user_organization.is_some());
    }

    #[tokio::test]
    async fn test_load_teams_without_team_fetches_list() {
        let (store, _, _) = signed_in(backend(None)).await;

        store.load_teams().await.unwrap();

        let state = store.state();
        assert!(state.user_organization.is_none());
        assert_eq!(state.organizations.len(), 3);
        assert_eq!(state.pagination.total, 3);
    }

    #[tokio::test]
    async fn test_load_teams_with_team_clears_list() {
        let (store, _, backend) = signed_in(backend(Some("org-3"))).await;

        store.load_teams().await.unwrap();

        let state = store.state();
        assert_eq!(state.user_organization_id(), Some(&org_id("org-3")));
        assert!(state.organizations.is_empty());
        assert_eq!(backend.list_fetches(), 0);
    }

    #[tokio::test]
    async fn test_fetch_organizations_with_search_and_paging() {
        let (store, _, _) = signed_in(backend(None)).await;

        let page = store
            .fetch_organizations(OrganizationQuery::new().with_search("  united "))
            .await
            .unwrap();
        assert_eq!(page.organizations.len(), 1);
        assert_eq!(store.state().search.as_deref(), Some("united"));

        store
            .fetch_organizations(OrganizationQuery::new().with_limit(2).with_page(2))
            .await
            .unwrap();
        let state = store.state();
        assert_eq!(state.organizations.len(), 1);
        assert!(state.pagination.has_prev_page);
        assert!(!state.pagination.has_next_page);
    }

    #[tokio::test]
    async fn test_fetch_organizations_rejects_invalid_limit() {
        let (store, _, backend) = signed_in(backend(None)).await;

        let result = store
            .fetch_organizations(OrganizationQuery::new().with_limit(0))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(store.state().organizations_error.is_some());
        assert_eq!(backend.list_fetches(), 0);
    }

    #[tokio::test]
    async fn test_subscription_status_and_eligibility() {
        let (store, _, _) = signed_in(backend(Some("org-1"))).await;

        let status = store.check_subscription_status().await.unwrap();
        assert!(status.is_subscribed);
        assert_eq!(status.organization_id, Some(org_id("org-1")));

        let can_join = store.check_join_eligibility(&org_id("org-2")).await.unwrap();
        assert!(!can_join);
    }

    #[tokio::test]
    async fn test_auth_sync_follows_auth_store() {
        let (store, auth, _) = signed_in(backend(Some("org-1"))).await;
        let store = Arc::new(store);
        let mut rx = store.subscribe();
        let handle = store.spawn_auth_sync();

        wait_for(&mut rx, |s| s.user_organization_id() == Some(&org_id("org-1"))).await;

        auth.set_team_reference(Some(org_id("org-2"))).await.unwrap();
        wait_for(&mut rx, |s| s.user_organization_id() == Some(&org_id("org-2"))).await;

        auth.logout().await.unwrap();
        wait_for(&mut rx, |s| s.user_organization.is_none()).await;

        handle.abort();
    }

    #[tokio::test]
    async fn test_auth_sync_self_heals_stale_reference() {
        let (store, auth, _) = signed_in(backend(Some("gone"))).await;
        let store = Arc::new(store);
        let mut auth_rx = auth.subscribe();
        let handle = store.spawn_auth_sync();

        tokio::time::timeout(Duration::from_secs(2), async {
            while auth_rx.borrow_and_update().team_reference().is_some() {
                auth_rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        assert!(store.state().user_organization.is_none());
        assert!(store.state().error.is_none());
        handle.abort();
    }
}
