//! # score_core - Tennis and Padel Match Scoring Engine
//!
//! Deterministic point-by-point scoring for tennis and padel matches, singles
//! and doubles, with a JSON API for scoreboard front ends.
//!
//! ## Features
//! - Classic, no-ad and Fast4 scoring, golden point and golden game
//! - Regular, championship and deciding-set super tiebreaks
//! - Super set (pro set to 9) and windbreak serving
//! - Serve rotation and court-side tracking
//! - Match/set/game point indicators and a flat overlay projection
//! - Pluggable persistence with compressed on-disk records

pub mod analysis;
pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

pub use analysis::{get_important_point, point_stakes, ImportantPoint, ImportantPointType, PointStakes};
pub use api::{
    apply_point_json, create_match_json, flatten_match, important_point_json, match_schema_json,
    overlay_json, switch_server_json, toggle_sides_json,
};
pub use engine::{
    apply_point, apply_side_change, next_server, remove_point, switch_server, toggle_sides,
    win_game, win_set,
};
pub use error::{Result, ScoreError};
pub use models::{
    new_match, CourtSide, CourtSides, Match, MatchFormat, MatchSetup, Player, PointValue,
    ScoringSystem, Server, Settings, SportType, TeamId, TiebreakType,
};
pub use session::{Scorekeeper, SessionConfig, SessionError};
pub use store::{FileMatchStore, InMemoryMatchStore, MatchStore, StoreError, Subscription};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the `Match` JSON document layout.
pub const SCHEMA_VERSION: &str = "1.0";
