//! Match domain module

mod entity;

pub use entity::{Game, GameSide, LiveScore, Match, MatchId, MatchStatus, MatchTeam};
