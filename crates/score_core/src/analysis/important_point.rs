//! Important-point analysis
//!
//! Derived, read-only view of a snapshot: which team (if any) is one point from
//! closing the game, the set or the match. The answer comes from trying the
//! point on a scratch copy with the same engine that scores real points, so the
//! indicator and the scoring rules cannot drift apart.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::apply_point;
use crate::models::{Match, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportantPointType {
    MatchPoint,
    SetPoint,
    GamePoint,
    TiebreakPoint,
}

/// Highest-priority live indicator. Both fields are `None` when nothing is at stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ImportantPoint {
    #[serde(rename = "type")]
    pub kind: Option<ImportantPointType>,
    pub team: Option<TeamId>,
}

impl ImportantPoint {
    pub const NONE: ImportantPoint = ImportantPoint { kind: None, team: None };

    fn new(kind: ImportantPointType, team: TeamId) -> Self {
        ImportantPoint { kind: Some(kind), team: Some(team) }
    }

    pub fn is_match_point(&self) -> bool {
        self.kind == Some(ImportantPointType::MatchPoint)
    }

    pub fn is_set_point(&self) -> bool {
        self.kind == Some(ImportantPointType::SetPoint)
    }

    pub fn is_game_point(&self) -> bool {
        matches!(self.kind, Some(ImportantPointType::GamePoint | ImportantPointType::TiebreakPoint))
    }
}

/// What winning the next point would close for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointStakes {
    pub game_point: bool,
    pub tiebreak_point: bool,
    pub set_point: bool,
    pub match_point: bool,
}

/// Stakes of the next point for `team`. All false on snapshots that do not accept points.
pub fn point_stakes(state: &Match, team: TeamId) -> PointStakes {
    let Some(set) = state.current_set() else {
        return PointStakes::default();
    };
    if state.is_completed {
        return PointStakes::default();
    }

    let games_before = set.games_for(team);
    let sets_before = state.score.sets_for(team);
    let in_tiebreak = set.is_tiebreak;

    let after = apply_point(state, team);
    let set_won = after.score.sets_for(team) > sets_before;
    let games_after = after.current_set().map(|s| s.games_for(team)).unwrap_or(0);
    let game_won = set_won || games_after > games_before;
    let match_won = after.is_completed && after.winner == Some(team);

    PointStakes {
        game_point: game_won && !in_tiebreak,
        tiebreak_point: game_won && in_tiebreak,
        set_point: set_won,
        match_point: match_won,
    }
}

/// Highest-priority indicator for the snapshot: match point, then set point,
/// then game/tiebreak point. Within a level team A is reported first.
pub fn get_important_point(state: Option<&Match>) -> ImportantPoint {
    let Some(state) = state else {
        return ImportantPoint::NONE;
    };
    if !state.accepts_points() {
        return ImportantPoint::NONE;
    }

    let stakes = TeamId::BOTH.map(|team| (team, point_stakes(state, team)));

    if let Some((team, _)) = stakes.iter().find(|(_, s)| s.match_point) {
        return ImportantPoint::new(ImportantPointType::MatchPoint, *team);
    }
    if let Some((team, _)) = stakes.iter().find(|(_, s)| s.set_point) {
        return ImportantPoint::new(ImportantPointType::SetPoint, *team);
    }
    for (team, s) in stakes.iter() {
        if s.tiebreak_point {
            return ImportantPoint::new(ImportantPointType::TiebreakPoint, *team);
        }
        if s.game_point {
            return ImportantPoint::new(ImportantPointType::GamePoint, *team);
        }
    }

    ImportantPoint::NONE
}
