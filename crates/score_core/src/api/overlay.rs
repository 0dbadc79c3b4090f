//! Flat key/value projection of a snapshot for broadcast overlays.
//!
//! Keys are `snake_case` with a `teamA_` / `teamB_` prefix for per-team values.
//! Point values are rendered as scoreboard labels here; the model only stores
//! raw values.

use serde_json::{Map, Value};

use super::json_api::{parse, to_json};
use crate::analysis::get_important_point;
use crate::models::{Match, TeamId};

/// Set columns always emitted, even for shorter matches.
pub const MIN_SET_COLUMNS: usize = 5;

fn team_name(state: &Match, team: TeamId) -> String {
    state.players(team).iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(" / ")
}

/// Current game label: `0/15/30/40/Ad` in a regular game, the raw count in a tiebreak.
fn game_label(state: &Match, team: TeamId) -> String {
    match state.current_set() {
        Some(set) if !state.is_completed => {
            let value = set.current_game.get(team);
            if set.is_tiebreak {
                value.count().to_string()
            } else {
                value.to_string()
            }
        }
        _ => String::new(),
    }
}

/// Games per set column; columns not reached yet are empty strings.
fn set_columns(state: &Match, team: TeamId) -> Vec<Value> {
    let configured = state.settings.sets.max(1) as usize;
    let columns = configured.max(MIN_SET_COLUMNS);

    let mut games: Vec<Value> = state.score.sets.iter().map(|s| Value::from(s.games(team))).collect();
    if !state.is_completed {
        if let Some(set) = state.current_set() {
            games.push(Value::from(set.games_for(team)));
        }
    }
    games.resize(columns.max(games.len()), Value::from(""));
    games
}

pub fn flatten_match(state: &Match) -> Map<String, Value> {
    let mut out = Map::new();
    let point = get_important_point(Some(state));
    let current = state.current_set();

    for team in TeamId::BOTH {
        let prefix = team.as_str();
        out.insert(format!("{prefix}_name"), Value::from(team_name(state, team)));
        out.insert(format!("{prefix}_score"), Value::from(state.score.sets_for(team)));
        out.insert(format!("{prefix}_game_score"), Value::from(game_label(state, team)));
        out.insert(
            format!("{prefix}_current_set"),
            Value::from(current.map_or(0, |s| s.games_for(team))),
        );
        out.insert(
            format!("{prefix}_serving"),
            Value::from(!state.is_completed && state.current_server.team == team),
        );
        for (i, games) in set_columns(state, team).into_iter().enumerate() {
            out.insert(format!("{prefix}_set{}", i + 1), games);
        }
    }

    out.insert("is_tiebreak".into(), Value::from(current.is_some_and(|s| s.is_tiebreak)));
    out.insert("is_completed".into(), Value::from(state.is_completed));
    out.insert("winner".into(), state.winner.map_or(Value::Null, |t| Value::from(t.as_str())));
    out.insert(
        "important_point_type".into(),
        point.kind.map_or(Value::Null, |k| serde_json::to_value(k).unwrap_or(Value::Null)),
    );
    out.insert(
        "important_point_team".into(),
        point.team.map_or(Value::Null, |t| Value::from(t.as_str())),
    );
    out.insert("is_match_point".into(), Value::from(point.is_match_point()));
    out.insert("is_set_point".into(), Value::from(point.is_set_point()));
    out.insert("is_game_point".into(), Value::from(point.is_game_point()));
    out
}

/// `Match` JSON in, flat overlay JSON out.
pub fn overlay_json(match_json: &str) -> Result<String, String> {
    let state: Match = parse(match_json)?;
    to_json(&flatten_match(&state))
}
