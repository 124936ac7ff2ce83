//! Domain layer - entities, validation rules and ports

pub mod backend;
pub mod error;
pub mod matches;
pub mod organization;
pub mod session;
pub mod user;

pub use backend::{RosterBackend, SubscriptionStatus};
pub use error::DomainError;
pub use matches::{Game, GameSide, LiveScore, Match, MatchId, MatchStatus, MatchTeam};
pub use organization::{
    team_abbreviation, Organization, OrganizationId, OrganizationPage, OrganizationQuery,
    OrganizationValidationError, Pagination, Player, PlayerId, PlayerUser,
};
pub use session::{SessionStorage, StoredSession};
pub use user::{
    AuthSession, LoginCredentials, RegisterCredentials, User, UserId, UserPatch,
    UserValidationError,
};
