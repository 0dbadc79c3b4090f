pub mod match_state;
pub mod score;
pub mod settings;
pub mod setup;
pub mod team;

pub use match_state::{CourtSides, Match, Server};
pub use score::{CurrentGame, CurrentSet, GameRecord, PointValue, Score, SetRecord, TiebreakScore};
pub use settings::{ScoringSystem, Settings, TiebreakType, SUPER_SET_GAMES};
pub use setup::{new_match, MatchSetup};
pub use team::{CourtSide, MatchFormat, Player, SportType, TeamId};
