//! Match snapshot
//!
//! `Match` is the root aggregate handed between the engines, the persistence
//! layer and the broadcast consumers. Engines never mutate a caller's snapshot;
//! they clone, advance the clone and return it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::score::{CurrentSet, Score};
use super::settings::Settings;
use super::team::{CourtSide, MatchFormat, Player, SportType, TeamId};

/// Who serves the next point. `player_index` is only meaningful in doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub team: TeamId,
    #[serde(default)]
    pub player_index: u8,
}

impl Default for Server {
    fn default() -> Self {
        Server { team: TeamId::TeamA, player_index: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtSides {
    pub team_a: CourtSide,
    pub team_b: CourtSide,
}

impl CourtSides {
    pub fn with_team_a_on(side: CourtSide) -> Self {
        CourtSides { team_a: side, team_b: side.opposite() }
    }

    pub fn swapped(self) -> Self {
        CourtSides { team_a: self.team_b, team_b: self.team_a }
    }

    pub fn side_of(&self, team: TeamId) -> CourtSide {
        match team {
            TeamId::TeamA => self.team_a,
            TeamId::TeamB => self.team_b,
        }
    }
}

impl Default for CourtSides {
    fn default() -> Self {
        CourtSides::with_team_a_on(CourtSide::Left)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    #[serde(rename = "type", default)]
    pub sport: SportType,
    #[serde(default)]
    pub format: MatchFormat,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub team_a: Vec<Player>,
    #[serde(default)]
    pub team_b: Vec<Player>,
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub current_server: Server,
    #[serde(default)]
    pub court_sides: CourtSides,
    #[serde(default)]
    pub should_change_sides: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub winner: Option<TeamId>,
}

impl Match {
    pub fn players(&self, team: TeamId) -> &[Player] {
        match team {
            TeamId::TeamA => &self.team_a,
            TeamId::TeamB => &self.team_b,
        }
    }

    pub fn current_set(&self) -> Option<&CurrentSet> {
        self.score.current_set.as_ref()
    }

    pub fn sets_to_win(&self) -> u32 {
        self.settings.sets_to_win()
    }

    /// 1-based number of the set in progress.
    pub fn current_set_number(&self) -> usize {
        self.score.sets.len() + 1
    }

    /// Whether the set in progress decides the match: both teams are one set
    /// from winning. For two-set matches this is the set after a 1-1 split.
    pub fn is_deciding_set(&self) -> bool {
        let needed = self.sets_to_win().saturating_sub(1);
        self.score.team_a == needed && self.score.team_b == needed
    }

    /// Points needed to take the tiebreak in progress.
    pub fn points_to_win_tiebreak(&self) -> u32 {
        let super_tiebreak = self.current_set().map(|s| s.is_super_tiebreak).unwrap_or(false);
        if super_tiebreak {
            self.settings.final_set_tiebreak_length
        } else {
            self.settings.tiebreak_type.points()
        }
    }

    /// Games played in the set in progress.
    pub fn total_games(&self) -> u32 {
        self.current_set().map(CurrentSet::total_games).unwrap_or(0)
    }

    /// Whether a new point may be applied.
    pub fn accepts_points(&self) -> bool {
        !self.is_completed && self.score.current_set.is_some()
    }

    /// Copy with the per-game log dropped, for writes that must stay small.
    pub fn without_history(&self) -> Match {
        let mut reduced = self.clone();
        if let Some(set) = reduced.score.current_set.as_mut() {
            set.games.clear();
        }
        reduced
    }

    /// Human-readable line, e.g. `6-4 3-2 (30-15)`.
    pub fn scoreline(&self) -> String {
        let mut parts: Vec<String> = self
            .score
            .sets
            .iter()
            .map(|set| match set.tiebreak {
                Some(tb) => {
                    format!("{}-{}({})", set.team_a, set.team_b, tb.team_a.min(tb.team_b))
                }
                None => format!("{}-{}", set.team_a, set.team_b),
            })
            .collect();

        if !self.is_completed {
            if let Some(set) = self.current_set() {
                let game = set.current_game;
                if set.is_super_tiebreak && set.total_games() == 0 {
                    parts.push(format!("[{}-{}]", game.team_a, game.team_b));
                } else {
                    parts.push(format!("{}-{}", set.team_a, set.team_b));
                    parts.push(format!("({}-{})", game.team_a, game.team_b));
                }
            }
        }

        parts.join(" ")
    }
}
