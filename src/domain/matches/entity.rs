//! Match entity and its game projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::organization::{
    validate_resource_id, OrganizationId, OrganizationValidationError,
};

const HOME_FALLBACK_NAME: &str = "Team 1";
const AWAY_FALLBACK_NAME: &str = "Team 2";

/// Match identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Result<Self, OrganizationValidationError> {
        let id = id.into();
        validate_resource_id("Match", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MatchId {
    type Error = OrganizationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MatchId> for String {
    fn from(id: MatchId) -> Self {
        id.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Scheduled or in play
    Active,
    /// Finished or archived
    Inactive,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Team summary embedded in a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTeam {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScore {
    pub team1_goals: u32,
    pub team2_goals: u32,
    pub is_live: bool,
}

/// Match as returned by `/matches` and `/matches/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub date: DateTime<Utc>,
    pub team1_id: String,
    pub team2_id: String,
    #[serde(default)]
    pub team1_goals: u32,
    #[serde(default)]
    pub team2_goals: u32,
    /// Duration in seconds
    #[serde(default)]
    pub duration: u64,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1: Option<MatchTeam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2: Option<MatchTeam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_score: Option<LiveScore>,
}

impl Match {
    pub fn home_name(&self) -> &str {
        self.team1
            .as_ref()
            .map(|team| team.name.as_str())
            .unwrap_or(HOME_FALLBACK_NAME)
    }

    pub fn away_name(&self) -> &str {
        self.team2
            .as_ref()
            .map(|team| team.name.as_str())
            .unwrap_or(AWAY_FALLBACK_NAME)
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_name(), self.away_name())
    }

    /// Whether the backend reports the match as currently in play
    pub fn is_live(&self) -> bool {
        self.live_score.is_some_and(|score| score.is_live)
    }

    /// Current score, preferring the live score when one is reported
    pub fn score(&self) -> (u32, u32) {
        match self.live_score {
            Some(live) if live.is_live => (live.team1_goals, live.team2_goals),
            _ => (self.team1_goals, self.team2_goals),
        }
    }

    /// Project this match into the game shape shown in schedules
    pub fn to_game(&self, organization_id: &OrganizationId) -> Game {
        Game {
            id: self.id.clone(),
            title: self.title(),
            description: self.notes.clone(),
            start_date: self.date,
            location: self.location.clone(),
            status: self.status,
            home_team: GameSide {
                id: self.team1_id.clone(),
                name: self.home_name().to_string(),
                score: Some(self.team1_goals),
            },
            away_team: GameSide {
                id: self.team2_id.clone(),
                name: self.away_name().to_string(),
                score: Some(self.team2_goals),
            },
            organization_id: organization_id.clone(),
        }
    }
}

/// One side of a game
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSide {
    pub id: String,
    pub name: String,
    pub score: Option<u32>,
}

/// Schedule entry derived from a match
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: MatchId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub location: Option<String>,
    pub status: MatchStatus,
    pub home_team: GameSide,
    pub away_team: GameSide,
    pub organization_id: OrganizationId,
}
