//! Set engine: archives a won set, then either ends the match or opens the next set.

use super::rotation::swap_sides;
use crate::models::{CurrentSet, Match, SetRecord, TeamId};

/// Award the current set to `team` at its current game score (manual correction).
pub fn win_set(state: &Match, team: TeamId) -> Match {
    let mut next = state.clone();
    if !state.accepts_points() {
        return next;
    }
    win_set_in_place(&mut next, team);
    next
}

pub(crate) fn win_set_in_place(state: &mut Match, team: TeamId) {
    let record = match state.current_set() {
        Some(set) => SetRecord {
            team_a: set.team_a,
            team_b: set.team_b,
            winner: team,
            tiebreak: set.tiebreak,
        },
        None => return,
    };

    log::info!(
        "match {}: set {} to {} ({}-{})",
        state.id,
        state.score.sets.len() + 1,
        team,
        record.team_a,
        record.team_b
    );

    state.score.add_set(team);
    state.score.sets.push(record);

    if state.score.sets_for(team) >= state.sets_to_win() {
        state.is_completed = true;
        state.winner = Some(team);
        log::info!(
            "match {}: won by {} ({}-{} in sets)",
            state.id,
            team,
            state.score.team_a,
            state.score.team_b
        );
        return;
    }

    let next_set = if state.settings.final_set_tiebreak && state.is_deciding_set() {
        log::debug!("match {}: deciding set played as a tiebreak", state.id);
        CurrentSet::deciding_tiebreak()
    } else {
        CurrentSet::default()
    };
    state.score.current_set = Some(next_set);

    if state.score.sets.len() % 2 == 1 {
        swap_sides(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::models::{CourtSide, Settings, TiebreakScore};

    #[test]
    fn test_best_of_three_completes_at_two() {
        let m = singles(Settings::default());
        let m = win_set(&m, TeamId::TeamA);
        assert!(!m.is_completed);
        let m = win_set(&m, TeamId::TeamA);
        assert!(m.is_completed);
        assert_eq!(m.winner, Some(TeamId::TeamA));
        assert_eq!(m.score.sets.len(), 2);
    }

    #[test]
    fn test_two_set_match_plays_off_a_split() {
        let settings = Settings { sets: 2, ..Settings::default() };
        let m = win_set(&singles(settings), TeamId::TeamA);
        let m = win_set(&m, TeamId::TeamB);
        assert!(!m.is_completed, "1-1 is not a result");
        assert!(m.is_deciding_set());
        let m = win_set(&m, TeamId::TeamB);
        assert!(m.is_completed);
        assert_eq!(m.winner, Some(TeamId::TeamB));
    }

    #[test]
    fn test_best_of_five() {
        let settings = Settings { sets: 5, ..Settings::default() };
        let mut m = singles(settings);
        for team in [TeamId::TeamA, TeamId::TeamB, TeamId::TeamA, TeamId::TeamB] {
            m = win_set(&m, team);
        }
        assert!(!m.is_completed);
        m = win_set(&m, TeamId::TeamB);
        assert!(m.is_completed);
        assert_eq!(m.winner, Some(TeamId::TeamB));
        assert_eq!(m.score.team_b, 3);
    }

    #[test]
    fn test_final_set_is_seeded_as_tiebreak() {
        let settings = Settings { final_set_tiebreak: true, ..Settings::default() };
        let m = win_set(&singles(settings), TeamId::TeamA);
        assert!(!set(&m).is_tiebreak, "second set is ordinary");
        let m = win_set(&m, TeamId::TeamB);
        let third = set(&m);
        assert!(third.is_tiebreak);
        assert!(third.is_super_tiebreak);
        assert_eq!(third.total_games(), 0);
        assert_eq!(m.points_to_win_tiebreak(), 10);
    }

    #[test]
    fn test_super_tiebreak_set_is_archived_as_one_nil() {
        let settings = Settings { final_set_tiebreak: true, ..Settings::default() };
        let m = win_set(&win_set(&singles(settings), TeamId::TeamA), TeamId::TeamB);
        let m = play(&m, "AAAAAAAAABBBBBBBBB");
        let m = play(&m, "A");
        assert!(!m.is_completed, "10-9 is not won by two");
        assert!(set(&m).is_tiebreak);

        let m = play(&m, "A");
        assert!(m.is_completed);
        assert_eq!(m.winner, Some(TeamId::TeamA));
        let decider = &m.score.sets[2];
        assert_eq!((decider.team_a, decider.team_b), (1, 0));
        assert_eq!(decider.tiebreak, Some(TiebreakScore { team_a: 11, team_b: 9 }));
    }

    #[test]
    fn test_sides_toggle_after_odd_sets() {
        let m = singles(Settings { sets: 5, ..Settings::default() });
        let m = win_set(&m, TeamId::TeamA);
        assert_eq!(m.court_sides.team_a, CourtSide::Right);
        let m = win_set(&m, TeamId::TeamB);
        assert_eq!(m.court_sides.team_a, CourtSide::Right, "no toggle after two sets");
        let m = win_set(&m, TeamId::TeamB);
        assert_eq!(m.court_sides.team_a, CourtSide::Left);
    }

    #[test]
    fn test_tiebreak_score_archived_with_set() {
        let mut m = with_games(singles(Settings::default()), 7, 6);
        if let Some(set) = m.score.current_set.as_mut() {
            set.tiebreak = Some(TiebreakScore { team_a: 7, team_b: 3 });
        }
        let m = win_set(&m, TeamId::TeamA);
        assert_eq!(m.score.sets[0].tiebreak, Some(TiebreakScore { team_a: 7, team_b: 3 }));
        assert!(set(&m).tiebreak.is_none());
    }
}
