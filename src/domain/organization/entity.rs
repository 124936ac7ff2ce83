//! Organization (team) and player types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_organization_id, validate_player_id, OrganizationValidationError,
};

/// Organization identifier as issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Create a new OrganizationId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, OrganizationValidationError> {
        let id = id.into();
        validate_organization_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrganizationId {
    type Error = OrganizationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrganizationId> for String {
    fn from(id: OrganizationId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Result<Self, OrganizationValidationError> {
        let id = id.into();
        validate_player_id(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = OrganizationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Organization (team) entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    id: OrganizationId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player_count: Option<u32>,
    created_at: DateTime<Utc>,
    /// Roster, only present on the single-organization endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    players: Option<Vec<Player>>,
}

impl Organization {
    /// Create a new organization
    pub fn new(id: OrganizationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            avatar: None,
            player_count: None,
            created_at: Utc::now(),
            players: None,
        }
    }

    /// Set description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set roster (builder pattern)
    pub fn with_players(mut self, players: Vec<Player>) -> Self {
        self.player_count = Some(players.len() as u32);
        self.players = Some(players);
        self
    }

    // Getters

    pub fn id(&self) -> &OrganizationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// Player count as reported by the backend, falling back to the roster size
    pub fn player_count(&self) -> usize {
        self.player_count
            .map(|count| count as usize)
            .or_else(|| self.players.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn players(&self) -> &[Player] {
        self.players.as_deref().unwrap_or_default()
    }

    /// Short display code derived from the team name
    pub fn abbreviation(&self) -> String {
        super::team_abbreviation(&self.name)
    }
}

/// Summary of the user account linked to a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUser {
    pub id: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub jersey_number: u32,
    #[serde(default)]
    pub position: String,
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub total_goals: u32,
    #[serde(default)]
    pub total_assists: u32,
    #[serde(default)]
    pub total_passes_completed: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PlayerUser>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}
