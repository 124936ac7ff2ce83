//! Persisted session port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Token and user record kept between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Storage for the authenticated session
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStorage: Send + Sync + std::fmt::Debug {
    /// Load the stored session, if any
    async fn load(&self) -> Result<Option<StoredSession>, DomainError>;

    /// Replace the stored session
    async fn save(&self, session: &StoredSession) -> Result<(), DomainError>;

    /// Remove the stored session
    async fn clear(&self) -> Result<(), DomainError>;
}
