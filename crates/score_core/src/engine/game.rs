//! Game engine: resolves a won regular game and checks the set thresholds.

use super::rotation::rotate_server;
use super::set::win_set_in_place;
use super::tiebreak::award_tiebreak;
use crate::models::{CurrentGame, CurrentSet, GameRecord, Match, Settings, TeamId, SUPER_SET_GAMES};

/// What the set does after a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetProgress {
    Continue,
    StartTiebreak { deciding: bool },
    SetWon(TeamId),
}

/// Award the current game to `team` (manual correction). During a tiebreak this
/// awards the tiebreak, and with it the set.
pub fn win_game(state: &Match, team: TeamId) -> Match {
    let mut next = state.clone();
    if !state.accepts_points() {
        return next;
    }
    if state.current_set().map(|s| s.is_tiebreak).unwrap_or(false) {
        award_tiebreak(&mut next, team);
    } else {
        win_game_in_place(&mut next, team);
    }
    next
}

pub(crate) fn win_game_in_place(state: &mut Match, team: TeamId) {
    let windbreak = state.settings.windbreak;
    let Some(set) = state.score.current_set.as_mut() else {
        return;
    };

    set.add_game(team);
    set.games.push(GameRecord { winner: team });
    set.current_game = CurrentGame::default();
    let total = set.total_games();

    log::debug!("match {}: game to {} ({}-{})", state.id, team, set.team_a, set.team_b);

    // Windbreak holds service for two games at a time.
    if !windbreak || total % 2 == 1 {
        rotate_server(state);
    }
    if total % 2 == 1 {
        state.should_change_sides = true;
    }

    let progress = match state.current_set() {
        Some(set) => set_progress(state, set),
        None => return,
    };

    match progress {
        SetProgress::Continue => {}
        SetProgress::StartTiebreak { deciding } => start_tiebreak(state, deciding),
        SetProgress::SetWon(winner) => win_set_in_place(state, winner),
    }
}

fn start_tiebreak(state: &mut Match, deciding: bool) {
    if let Some(set) = state.score.current_set.as_mut() {
        set.is_tiebreak = true;
        set.is_super_tiebreak = deciding;
        set.current_game = CurrentGame::default();
        log::debug!(
            "match {}: tiebreak at {}-{} (deciding={})",
            state.id,
            set.team_a,
            set.team_b,
            deciding
        );
    }
}

/// Set thresholds, checked in order after every regular game:
/// super set (exclusive), tiebreak trigger, golden game, ordinary set win.
pub(crate) fn set_progress(state: &Match, set: &CurrentSet) -> SetProgress {
    let settings = &state.settings;
    if settings.is_super_set {
        return super_set_progress(set);
    }

    let (a, b) = (set.team_a, set.team_b);
    if a == b && a == settings.tiebreak_at {
        if settings.final_set_tiebreak && state.is_deciding_set() {
            return SetProgress::StartTiebreak { deciding: true };
        }
        if settings.tiebreak_enabled {
            return SetProgress::StartTiebreak { deciding: false };
        }
    }

    if let Some(winner) = golden_game_winner(settings, set) {
        return SetProgress::SetWon(winner);
    }

    match set.leader() {
        Some(leader)
            if set.games_for(leader) >= settings.games_to_win_set()
                && set.margin() >= settings.set_win_margin() =>
        {
            SetProgress::SetWon(leader)
        }
        _ => SetProgress::Continue,
    }
}

/// Super set: played to 8 by two, 9-7 closes it, 8-8 goes to a tiebreak.
fn super_set_progress(set: &CurrentSet) -> SetProgress {
    let (a, b) = (set.team_a, set.team_b);
    if a == SUPER_SET_GAMES && b == SUPER_SET_GAMES {
        return SetProgress::StartTiebreak { deciding: false };
    }
    let Some(leader) = set.leader() else {
        return SetProgress::Continue;
    };
    let lead = set.games_for(leader);
    let closes_at_nine = matches!((a, b), (9, 7) | (7, 9));
    if (lead >= SUPER_SET_GAMES && set.margin() >= 2) || closes_at_nine {
        SetProgress::SetWon(leader)
    } else {
        SetProgress::Continue
    }
}

fn golden_game_winner(settings: &Settings, set: &CurrentSet) -> Option<TeamId> {
    if !settings.golden_game {
        return None;
    }
    match (set.team_a, set.team_b) {
        (6, 5) => Some(TeamId::TeamA),
        (5, 6) => Some(TeamId::TeamB),
        _ => None,
    }
}
