//! Authentication store
//!
//! Observable wrapper around [`AuthService`]. Every mutation of the signed-in
//! user goes through here so dependants such as the organization store can
//! react to it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::error;

use super::Observable;
use crate::domain::{
    DomainError, LoginCredentials, OrganizationId, RegisterCredentials, User, UserPatch,
};
use crate::infrastructure::auth::AuthService;

const INITIALIZE_FAILED: &str = "Failed to initialize authentication";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_initialized: bool,
}

impl AuthState {
    /// Team reference of the signed-in user, if any
    pub fn team_reference(&self) -> Option<&OrganizationId> {
        self.user.as_ref().and_then(|user| user.organization_id())
    }

    /// Team content is only shown to signed-in users that belong to a team
    pub fn can_view_team_content(&self) -> bool {
        self.is_authenticated && self.team_reference().is_some()
    }
}

#[derive(Debug)]
pub struct AuthStore {
    service: Arc<AuthService>,
    state: Observable<AuthState>,
}

impl AuthStore {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self {
            service,
            state: Observable::default(),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read(|s| s.user.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Restore the persisted session; later calls are no-ops
    pub async fn initialize(&self) {
        if self.state.read(|s| s.is_initialized) {
            return;
        }

        self.state.update(|s| s.is_loading = true);

        match self.service.initialize().await {
            Ok(()) => self.sync_from_service(),
            Err(e) => {
                error!(error = %e, "Failed to initialize authentication");
                self.state.update(|s| {
                    s.user = None;
                    s.is_authenticated = false;
                    s.error = Some(INITIALIZE_FAILED.to_string());
                });
            }
        }

        self.state.update(|s| {
            s.is_loading = false;
            s.is_initialized = true;
        });
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, DomainError> {
        self.begin();

        match self.service.login(credentials).await {
            Ok(session) => {
                self.sync_from_service();
                self.state.update(|s| s.is_loading = false);
                Ok(session.user)
            }
            Err(e) => {
                self.state.update(|s| {
                    s.is_loading = false;
                    s.is_authenticated = false;
                    s.error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }

    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<User, DomainError> {
        self.begin();

        match self.service.register(credentials).await {
            Ok(session) => {
                self.sync_from_service();
                self.state.update(|s| s.is_loading = false);
                Ok(session.user)
            }
            Err(e) => {
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> Result<(), DomainError> {
        let result = self.service.logout().await;
        if let Err(e) = &result {
            error!(error = %e, "Failed to clear stored session");
        }

        self.state.update(|s| {
            s.user = None;
            s.is_authenticated = false;
            s.error = None;
        });
        result
    }

    /// Merge `patch` into the signed-in user
    ///
    /// The in-memory user is updated even if persisting the change fails; the
    /// persistence error is still returned.
    pub async fn update_user(&self, patch: &UserPatch) -> Result<(), DomainError> {
        let result = self.service.update_user(patch).await;
        self.sync_from_service();

        if let Err(e) = &result {
            error!(error = %e, "Failed to persist user update");
        }
        result.map(|_| ())
    }

    pub async fn set_team_reference(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> Result<(), DomainError> {
        self.update_user(&UserPatch::team_reference(organization_id))
            .await
    }

    /// Reread the persisted user record into state
    pub async fn force_reload_user(&self) -> Result<(), DomainError> {
        self.service.reload().await?;
        self.sync_from_service();
        Ok(())
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    fn begin(&self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn sync_from_service(&self) {
        let user = self.service.user();
        let is_authenticated = self.service.is_authenticated();
        self.state.update(|s| {
            s.user = user;
            s.is_authenticated = is_authenticated;
        });
    }
}
