//! Fixtures shared by the engine tests.

use super::apply_point;
use crate::models::{
    new_match, CurrentGame, CurrentSet, GameRecord, Match, MatchSetup, Settings, TeamId,
};

pub fn singles(settings: Settings) -> Match {
    new_match(MatchSetup::singles("Ana", "Bea").with_settings(settings)).unwrap()
}

pub fn doubles(settings: Settings) -> Match {
    new_match(MatchSetup::doubles(["A1", "A2"], ["B1", "B2"]).with_settings(settings)).unwrap()
}

pub fn set(m: &Match) -> &CurrentSet {
    m.current_set().expect("set in progress")
}

pub fn game(m: &Match) -> CurrentGame {
    set(m).current_game
}

/// Apply a sequence of points written as `A`/`B` characters.
pub fn play(m: &Match, points: &str) -> Match {
    points.chars().fold(m.clone(), |state, c| match c {
        'A' => apply_point(&state, TeamId::TeamA),
        'B' => apply_point(&state, TeamId::TeamB),
        _ => state,
    })
}

/// 40-40 in the first game.
pub fn at_deuce(m: Match) -> Match {
    play(&m, "AAABBB")
}

/// Place the set in progress at `a`-`b` games, with a matching game log.
pub fn with_games(mut m: Match, a: u32, b: u32) -> Match {
    if let Some(set) = m.score.current_set.as_mut() {
        set.team_a = a;
        set.team_b = b;
        set.games = (0..a)
            .map(|_| GameRecord { winner: TeamId::TeamA })
            .chain((0..b).map(|_| GameRecord { winner: TeamId::TeamB }))
            .collect();
        set.current_game = CurrentGame::default();
    }
    m
}

/// Place the set in progress at 6-6 with the tiebreak under way.
pub fn in_tiebreak(settings: Settings) -> Match {
    let mut m = with_games(singles(settings), 6, 6);
    if let Some(set) = m.score.current_set.as_mut() {
        set.is_tiebreak = true;
    }
    m
}
