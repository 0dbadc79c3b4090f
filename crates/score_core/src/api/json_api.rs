use serde::{Deserialize, Serialize};

use crate::analysis::{get_important_point, point_stakes, ImportantPoint, PointStakes};
use crate::engine::{apply_point, apply_side_change, switch_server, toggle_sides};
use crate::error::ScoreError;
use crate::models::{new_match, Match, MatchSetup, TeamId};
use crate::SCHEMA_VERSION;

pub mod error_codes {
    pub const INVALID_JSON: &str = "E_INVALID_JSON";
    pub const INVALID_SETUP: &str = "E_INVALID_SETUP";
    pub const SERIALIZE: &str = "E_SERIALIZE";
}

pub(crate) fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

pub(crate) fn parse<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| {
        err_code(error_codes::INVALID_JSON, ScoreError::DeserializationError(e.to_string()))
    })
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| {
        err_code(error_codes::SERIALIZE, ScoreError::SerializationError(e.to_string()))
    })
}

#[derive(Debug, Deserialize)]
pub struct PointRequest {
    #[serde(rename = "match")]
    pub state: Match,
    pub team: TeamId,
}

/// Snapshot plus the indicators a scoreboard shows next to it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointResponse {
    #[serde(rename = "match")]
    pub state: Match,
    pub important_point: ImportantPoint,
    pub stakes_team_a: PointStakes,
    pub stakes_team_b: PointStakes,
}

impl PointResponse {
    fn from_state(state: Match) -> Self {
        PointResponse {
            important_point: get_important_point(Some(&state)),
            stakes_team_a: point_stakes(&state, TeamId::TeamA),
            stakes_team_b: point_stakes(&state, TeamId::TeamB),
            state,
        }
    }
}

/// `MatchSetup` JSON in, new `Match` JSON out.
pub fn create_match_json(setup_json: &str) -> Result<String, String> {
    let setup: MatchSetup = parse(setup_json)?;
    let state = new_match(setup).map_err(|e| err_code(error_codes::INVALID_SETUP, e))?;
    to_json(&state)
}

/// `{ "match": Match, "team": "teamA" | "teamB" }` in, `PointResponse` JSON out.
/// Points on a completed match return the snapshot unchanged.
pub fn apply_point_json(request_json: &str) -> Result<String, String> {
    let request: PointRequest = parse(request_json)?;
    let next = apply_point(&request.state, request.team);
    to_json(&PointResponse::from_state(next))
}

/// `Match` JSON (or `null`) in, `{ "type", "team" }` out.
pub fn important_point_json(match_json: &str) -> Result<String, String> {
    let state: Option<Match> = parse(match_json)?;
    to_json(&get_important_point(state.as_ref()))
}

pub fn switch_server_json(match_json: &str) -> Result<String, String> {
    let state: Match = parse(match_json)?;
    to_json(&switch_server(&state))
}

pub fn toggle_sides_json(match_json: &str) -> Result<String, String> {
    let state: Match = parse(match_json)?;
    to_json(&toggle_sides(&state))
}

pub fn apply_side_change_json(match_json: &str) -> Result<String, String> {
    let state: Match = parse(match_json)?;
    to_json(&apply_side_change(&state))
}

/// JSON Schema of the `Match` snapshot document, tagged with the document layout version.
pub fn match_schema_json() -> Result<String, String> {
    let schema = schemars::schema_for!(Match);
    let mut value =
        serde_json::to_value(&schema).map_err(|e| err_code(error_codes::SERIALIZE, e))?;
    if let Some(root) = value.as_object_mut() {
        root.insert("$comment".into(), format!("match document v{SCHEMA_VERSION}").into());
    }
    serde_json::to_string_pretty(&value).map_err(|e| err_code(error_codes::SERIALIZE, e))
}
