use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ScoreError;

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TeamId {
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "teamB")]
    TeamB,
}

impl TeamId {
    pub const BOTH: [TeamId; 2] = [TeamId::TeamA, TeamId::TeamB];

    pub fn opponent(self) -> TeamId {
        match self {
            TeamId::TeamA => TeamId::TeamB,
            TeamId::TeamB => TeamId::TeamA,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TeamId::TeamA => "teamA",
            TeamId::TeamB => "teamB",
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamId {
    type Err = ScoreError;

    /// Accepts the wire names plus the short forms used by score entry ("A", "b").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "teamA" | "A" | "a" => Ok(TeamId::TeamA),
            "teamB" | "B" | "b" => Ok(TeamId::TeamB),
            other => Err(ScoreError::InvalidTeam(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SportType {
    #[default]
    Tennis,
    Padel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    #[default]
    Singles,
    Doubles,
}

impl MatchFormat {
    /// Players each team fields in this format.
    pub fn players_per_team(self) -> usize {
        match self {
            MatchFormat::Singles => 1,
            MatchFormat::Doubles => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CourtSide {
    Left,
    Right,
}

impl CourtSide {
    pub fn opposite(self) -> CourtSide {
        match self {
            CourtSide::Left => CourtSide::Right,
            CourtSide::Right => CourtSide::Left,
        }
    }
}

/// Roster entry. Only the name matters to scoring; the id links back to the roster service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct Player {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), id: None }
    }
}
