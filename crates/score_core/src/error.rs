use std::fmt;

use crate::models::TeamId;

#[derive(Debug)]
pub enum ScoreError {
    InvalidSetup(String),
    InvalidTeamSize { team: TeamId, expected: usize, found: usize },
    InvalidTeam(String),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScoreError::InvalidSetup(msg) => write!(f, "Invalid match setup: {}", msg),
            ScoreError::InvalidTeamSize { team, expected, found } => {
                write!(f, "Invalid team size for {}: expected {}, found {}", team, expected, found)
            }
            ScoreError::InvalidTeam(team) => write!(f, "Invalid team id: {}", team),
            ScoreError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            ScoreError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for ScoreError {}

pub type Result<T> = std::result::Result<T, ScoreError>;
