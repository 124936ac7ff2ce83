//! Roster backend port
//!
//! The REST backend is the only remote collaborator. Stores depend on this
//! trait so they can be exercised against the in-memory mock below.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::matches::{Match, MatchId, MatchStatus};
use crate::domain::organization::{
    Organization, OrganizationId, OrganizationPage, OrganizationQuery, Player, PlayerId,
};
use crate::domain::user::{AuthSession, LoginCredentials, RegisterCredentials, User, UserId};
use crate::domain::DomainError;

/// Server-side view of a user's subscription
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
}

/// Operations offered by the roster REST backend
#[async_trait]
pub trait RosterBackend: Send + Sync + std::fmt::Debug {
    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, DomainError>;

    /// `POST /auth/register`
    async fn register(&self, credentials: &RegisterCredentials)
        -> Result<AuthSession, DomainError>;

    /// `GET /users/{id}`
    async fn get_user(&self, id: &UserId) -> Result<User, DomainError>;

    /// `GET /organizations/{id}`
    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization, DomainError>;

    /// `GET /organizations?page=&limit=&search=`
    async fn list_organizations(
        &self,
        query: &OrganizationQuery,
    ) -> Result<OrganizationPage, DomainError>;

    /// `POST /users/subscribe`
    async fn subscribe(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<(), DomainError>;

    /// `POST /users/unsubscribe`
    async fn unsubscribe(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// `GET /users/unsubscribe?userId=`
    async fn subscription_status(&self, user_id: &UserId)
        -> Result<SubscriptionStatus, DomainError>;

    /// `GET /users/subscribe?userId=&organizationId=`
    async fn join_eligibility(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<bool, DomainError>;

    /// `GET /players/{id}`
    async fn get_player(&self, id: &PlayerId) -> Result<Player, DomainError>;

    /// `GET /matches/{id}`
    async fn get_match(&self, id: &MatchId) -> Result<Match, DomainError>;

    /// `GET /matches?status=&limit=`
    async fn list_matches(&self, status: MatchStatus, limit: u32)
        -> Result<Vec<Match>, DomainError>;
}
