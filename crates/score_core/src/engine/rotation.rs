//! Server rotation and court-side changes.

use crate::models::{Match, MatchFormat, Server, TeamId};

/// Next server in rotation order.
///
/// Singles alternates teams. Doubles cycles A0 → B0 → A1 → B1 → A0: moving from
/// team A keeps the player index, moving from team B flips it.
pub fn next_server(format: MatchFormat, server: Server) -> Server {
    match format {
        MatchFormat::Singles => Server { team: server.team.opponent(), player_index: 0 },
        MatchFormat::Doubles => match server.team {
            TeamId::TeamA => Server { team: TeamId::TeamB, player_index: server.player_index },
            TeamId::TeamB => Server {
                team: TeamId::TeamA,
                player_index: if server.player_index == 0 { 1 } else { 0 },
            },
        },
    }
}

pub(crate) fn rotate_server(state: &mut Match) {
    let next = next_server(state.format, state.current_server);
    log::debug!(
        "match {}: service {}#{} -> {}#{}",
        state.id,
        state.current_server.team,
        state.current_server.player_index,
        next.team,
        next.player_index
    );
    state.current_server = next;
}

pub(crate) fn swap_sides(state: &mut Match) {
    state.court_sides = state.court_sides.swapped();
    state.should_change_sides = false;
}

/// Hand service to the next server. Completed matches are returned unchanged.
pub fn switch_server(state: &Match) -> Match {
    let mut next = state.clone();
    if !state.is_completed {
        rotate_server(&mut next);
    }
    next
}

/// Swap court sides now and clear any pending change.
pub fn toggle_sides(state: &Match) -> Match {
    let mut next = state.clone();
    if !state.is_completed {
        swap_sides(&mut next);
    }
    next
}

/// Carry out a pending side change, if one is flagged. Idempotent: a second call
/// finds the flag cleared and changes nothing.
pub fn apply_side_change(state: &Match) -> Match {
    let mut next = state.clone();
    if state.should_change_sides && !state.is_completed {
        swap_sides(&mut next);
    }
    next
}
