//! Session manager: login, registration and persisted credentials

use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};
use validator::{Validate, ValidationErrors};

use super::token::{token_status, TokenCell};
use crate::domain::{
    AuthSession, DomainError, LoginCredentials, RegisterCredentials, RosterBackend,
    SessionStorage, StoredSession, User, UserPatch,
};

/// Owns the current token and user record and keeps them persisted
#[derive(Debug)]
pub struct AuthService {
    backend: Arc<dyn RosterBackend>,
    storage: Arc<dyn SessionStorage>,
    token: TokenCell,
    user: RwLock<Option<User>>,
}

impl AuthService {
    /// Create a new auth service
    ///
    /// `token` must be the same cell the REST backend reads its bearer token from.
    pub fn new(
        backend: Arc<dyn RosterBackend>,
        storage: Arc<dyn SessionStorage>,
        token: TokenCell,
    ) -> Self {
        Self {
            backend,
            storage,
            token,
            user: RwLock::new(None),
        }
    }

    /// Load the persisted session, discarding it if its JWT has expired
    pub async fn initialize(&self) -> Result<(), DomainError> {
        let stored = self.storage.load().await?;

        let Some(session) = stored else {
            debug!("No stored session");
            self.set_session(None, None);
            return Ok(());
        };

        if token_status(&session.token).is_expired() {
            warn!(user_id = %session.user.id(), "Stored session token expired, discarding");
            self.storage.clear().await?;
            self.set_session(None, None);
            return Ok(());
        }

        debug!(user_id = %session.user.id(), "Restored stored session");
        self.set_session(Some(session.token), Some(session.user));
        Ok(())
    }

    /// Log in with email and password
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, DomainError> {
        credentials
            .validate()
            .map_err(|e| DomainError::validation(validation_message(&e)))?;

        let session = self.backend.login(credentials).await?;
        self.persist(&session).await?;

        info!(user_id = %session.user.id(), "User logged in");
        Ok(session)
    }

    /// Register a new account and log in as it
    pub async fn register(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<AuthSession, DomainError> {
        credentials
            .validate()
            .map_err(|e| DomainError::validation(validation_message(&e)))?;

        let session = self.backend.register(credentials).await?;
        self.persist(&session).await?;

        info!(user_id = %session.user.id(), "User registered");
        Ok(session)
    }

    /// Forget the session locally and in storage
    ///
    /// The in-memory session is dropped even when clearing storage fails.
    pub async fn logout(&self) -> Result<(), DomainError> {
        self.set_session(None, None);
        self.storage.clear().await?;

        info!("User logged out");
        Ok(())
    }

    /// Merge a partial update into the current user and persist it
    ///
    /// The in-memory record is updated even when persisting fails, so callers
    /// always observe the patch. Returns `None` when no user is signed in.
    pub async fn update_user(&self, patch: &UserPatch) -> Result<Option<User>, DomainError> {
        let (Some(token), Some(mut user)) = (self.token.get(), self.user()) else {
            return Ok(None);
        };

        user.apply(patch);
        self.set_user(Some(user.clone()));
        self.storage
            .save(&StoredSession::new(token, user.clone()))
            .await?;

        Ok(Some(user))
    }

    /// Reread the persisted session into memory
    pub async fn reload(&self) -> Result<(), DomainError> {
        self.initialize().await
    }

    pub fn user(&self) -> Option<User> {
        self.user.read().ok().and_then(|user| user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.token.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_set() && self.user().is_some()
    }

    async fn persist(&self, session: &AuthSession) -> Result<(), DomainError> {
        self.storage
            .save(&StoredSession::new(&session.token, session.user.clone()))
            .await?;
        self.set_session(Some(session.token.clone()), Some(session.user.clone()));
        Ok(())
    }

    fn set_session(&self, token: Option<String>, user: Option<User>) {
        self.token.set(token);
        self.set_user(user);
    }

    fn set_user(&self, user: Option<User>) {
        if let Ok(mut slot) = self.user.write() {
            *slot = user;
        }
    }
}

/// Flatten validator output into a single message, field order stable
fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        })
        .collect();
    messages.sort();

    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}
