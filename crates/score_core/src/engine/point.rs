//! Point engine: applies one point and dispatches to regular-game or tiebreak play.

use super::game::win_game_in_place;
use super::tiebreak::tiebreak_point;
use crate::models::{Match, PointValue, TeamId};

/// Apply one point won by `team`.
///
/// Completed matches and snapshots without a set in progress come back
/// unchanged; this is a no-op, not an error.
pub fn apply_point(state: &Match, team: TeamId) -> Match {
    let mut next = state.clone();
    if !state.accepts_points() {
        log::debug!("match {}: point for {} ignored, match not accepting points", state.id, team);
        return next;
    }
    score_point(&mut next, team);
    next
}

pub(crate) fn score_point(state: &mut Match, team: TeamId) {
    let in_tiebreak = match state.current_set() {
        Some(set) => set.is_tiebreak,
        None => return,
    };

    if in_tiebreak {
        tiebreak_point(state, team);
    } else {
        regular_point(state, team);
    }
}

fn regular_point(state: &mut Match, team: TeamId) {
    let advantage_play = state.settings.scoring_system.has_advantage();
    let golden_point = state.settings.golden_point;
    let Some(set) = state.score.current_set.as_mut() else {
        return;
    };

    let game = &mut set.current_game;
    let mine = game.get(team);
    let theirs = game.get(team.opponent());

    let won = if mine.is_advantage() {
        true
    } else if !mine.is_forty() {
        game.set(team, mine.next_regular());
        false
    } else if !advantage_play {
        // no-ad / fast4: any point at 40 decides
        true
    } else if theirs.is_advantage() {
        // back to deuce
        game.set(team.opponent(), PointValue::FORTY);
        false
    } else if theirs.is_forty() {
        if golden_point {
            true
        } else {
            game.set(team, PointValue::Advantage);
            false
        }
    } else {
        true
    };

    if won {
        win_game_in_place(state, team);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::models::{CurrentGame, ScoringSystem, Settings};

    #[test]
    fn test_progression_to_game() {
        let mut m = singles(Settings::default());
        for expected in [15, 30, 40] {
            m = apply_point(&m, TeamId::TeamA);
            assert_eq!(game(&m).team_a, PointValue::Count(expected));
        }
        m = apply_point(&m, TeamId::TeamA);
        assert_eq!(set(&m).team_a, 1);
        assert_eq!(game(&m), CurrentGame::default());
    }

    #[test]
    fn test_deuce_advantage_and_game() {
        let m = at_deuce(singles(Settings::default()));
        let server_before = m.current_server;

        let m = apply_point(&m, TeamId::TeamA);
        assert_eq!(game(&m).team_a, PointValue::Advantage);
        assert_eq!(game(&m).team_b, PointValue::FORTY);

        let m = apply_point(&m, TeamId::TeamA);
        assert_eq!(set(&m).team_a, 1);
        assert_eq!(game(&m), CurrentGame::default());
        assert_ne!(m.current_server, server_before);
    }

    #[test]
    fn test_advantage_lost_returns_to_deuce() {
        let m = at_deuce(singles(Settings::default()));
        let m = apply_point(&m, TeamId::TeamB);
        assert_eq!(game(&m).team_b, PointValue::Advantage);
        let m = apply_point(&m, TeamId::TeamA);
        assert_eq!(game(&m).team_a, PointValue::FORTY);
        assert_eq!(game(&m).team_b, PointValue::FORTY);
        assert_eq!(set(&m).total_games(), 0);
    }

    #[test]
    fn test_golden_point_decides_at_deuce() {
        let settings = Settings { golden_point: true, ..Settings::default() };
        let m = apply_point(&at_deuce(singles(settings)), TeamId::TeamB);
        assert_eq!(set(&m).team_b, 1);
        assert_eq!(game(&m), CurrentGame::default());
    }

    #[test]
    fn test_no_ad_never_reaches_advantage() {
        for scoring in [ScoringSystem::NoAd, ScoringSystem::Fast4] {
            let settings = Settings { scoring_system: scoring, ..Settings::default() };
            let m = apply_point(&at_deuce(singles(settings)), TeamId::TeamA);
            assert_eq!(set(&m).team_a, 1, "{scoring:?} decides at 40-40");
            assert_eq!(game(&m), CurrentGame::default());
        }
    }

    #[test]
    fn test_completed_match_rejects_points() {
        let mut m = singles(Settings::default());
        m.is_completed = true;
        m.winner = Some(TeamId::TeamA);
        assert_eq!(apply_point(&m, TeamId::TeamB), m);
    }

    #[test]
    fn test_missing_current_set_is_noop() {
        let mut m = singles(Settings::default());
        m.score.current_set = None;
        assert_eq!(apply_point(&m, TeamId::TeamA), m);
    }

    #[test]
    fn test_input_snapshot_untouched() {
        let m = singles(Settings::default());
        let before = m.clone();
        let _ = apply_point(&m, TeamId::TeamA);
        assert_eq!(m, before);
    }
}
