//! Manual point corrections.
//!
//! `remove_point` only steps the current game back. It does not reverse a
//! server rotation or a pending side change, so it is not an undo: full undo
//! restores an earlier snapshot (see `session`).

use crate::models::{Match, PointValue, TeamId};

/// Take one point away from `team` in the game in progress.
pub fn remove_point(state: &Match, team: TeamId) -> Match {
    let mut next = state.clone();
    if !state.accepts_points() {
        return next;
    }
    let Some(set) = next.score.current_set.as_mut() else {
        return next;
    };

    let game = &mut set.current_game;
    let value = game.get(team);
    if set.is_tiebreak {
        game.set(team, PointValue::Count(value.count().saturating_sub(1)));
    } else {
        let previous = value.previous_regular();
        game.set(team, previous);
        // 30-Ad is not a state: the opponent drops back to 40.
        if !previous.is_forty() && game.get(team.opponent()).is_advantage() {
            game.set(team.opponent(), PointValue::FORTY);
        }
    }

    log::debug!("match {}: point removed from {} ({}-{})", next.id, team, game.team_a, game.team_b);
    next
}
