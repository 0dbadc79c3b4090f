//! Tiebreak engine: raw point counting inside a tiebreak.
//!
//! Target points: a super tiebreak plays to the final-set length (7 or 10),
//! otherwise a championship tiebreak plays to 10 and a regular one to 7.
//! Always won by two.

use super::rotation::rotate_server;
use super::set::win_set_in_place;
use crate::models::{CurrentGame, Match, PointValue, TeamId, TiebreakScore};

/// Points between side changes inside a tiebreak.
const SIDE_CHANGE_EVERY: u32 = 6;

pub(crate) fn tiebreak_point(state: &mut Match, team: TeamId) {
    let target = state.points_to_win_tiebreak();
    let Some(set) = state.score.current_set.as_mut() else {
        return;
    };

    let game = &mut set.current_game;
    let mine = game.get(team).count() + 1;
    game.set(team, PointValue::Count(mine));
    let theirs = game.get(team.opponent()).count();

    if mine >= target && mine >= theirs + 2 {
        award_tiebreak(state, team);
        return;
    }

    let total = game.total_count();
    // First server serves one point, then two each.
    if total % 2 == 1 {
        rotate_server(state);
    }
    if total % SIDE_CHANGE_EVERY == 0 {
        state.should_change_sides = true;
    }
}

/// Close the tiebreak for `team` at its current score: the points are kept with
/// the set, the winner gets the deciding game and the set is resolved.
pub(crate) fn award_tiebreak(state: &mut Match, team: TeamId) {
    let Some(set) = state.score.current_set.as_mut() else {
        return;
    };

    let game = set.current_game;
    set.tiebreak = Some(TiebreakScore { team_a: game.team_a.count(), team_b: game.team_b.count() });
    set.add_game(team);
    set.current_game = CurrentGame::default();

    log::debug!(
        "match {}: tiebreak to {} ({}-{}), set {}-{}",
        state.id,
        team,
        game.team_a,
        game.team_b,
        set.team_a,
        set.team_b
    );

    win_set_in_place(state, team);
}
