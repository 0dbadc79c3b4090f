//! Match rule set.
//!
//! Settings are fixed when a match is created. Stored records come from several
//! writers (control UI, API, older snapshots), so deserialization never fails on a
//! bad field: every field is normalized on its own and falls back to its default.
//!
//! | field                    | accepted input                         | default   |
//! |--------------------------|----------------------------------------|-----------|
//! | `sets`                   | 1, 2, 3, 5, `"super"`                  | 3         |
//! | `scoringSystem`          | `classic`, `no-ad`, `fast4`            | classic   |
//! | `tiebreakEnabled`        | bool                                   | true      |
//! | `tiebreakType`           | `regular`, `championship` (or 7 / 10)  | regular   |
//! | `tiebreakAt`             | `"4-4"`, `"5-5"`, `"6-6"` (or 4/5/6)   | 6-6       |
//! | `finalSetTiebreak`       | bool                                   | false     |
//! | `finalSetTiebreakLength` | 7, 10                                  | 10        |
//! | `goldenGame`             | bool                                   | false     |
//! | `goldenPoint`            | bool                                   | false     |
//! | `windbreak`              | bool                                   | false     |
//!
//! Booleans also accept `"true"`/`"false"` and `0`/`1`.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_SETS: u8 = 3;
pub const DEFAULT_TIEBREAK_AT: u32 = 6;
pub const DEFAULT_FINAL_SET_TIEBREAK_LENGTH: u32 = 10;

/// Games a super set is played to.
pub const SUPER_SET_GAMES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringSystem {
    #[default]
    Classic,
    NoAd,
    Fast4,
}

impl ScoringSystem {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "classic" | "standard" => Some(ScoringSystem::Classic),
            "no-ad" | "noad" | "no_ad" => Some(ScoringSystem::NoAd),
            "fast4" | "fast-4" => Some(ScoringSystem::Fast4),
            _ => None,
        }
    }

    /// Whether 40-40 can turn into an advantage state.
    pub fn has_advantage(self) -> bool {
        matches!(self, ScoringSystem::Classic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TiebreakType {
    /// First to 7
    #[default]
    Regular,
    /// First to 10
    Championship,
}

impl TiebreakType {
    pub fn points(self) -> u32 {
        match self {
            TiebreakType::Regular => 7,
            TiebreakType::Championship => 10,
        }
    }
}

/// Normalized rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "SettingsDocument")]
pub struct Settings {
    /// 1, 2, 3 or 5. A super set is stored as 1 with `is_super_set`.
    pub sets: u8,
    pub is_super_set: bool,
    pub scoring_system: ScoringSystem,
    pub tiebreak_enabled: bool,
    pub tiebreak_type: TiebreakType,
    /// Game count (per team) at which a tiebreak starts.
    pub tiebreak_at: u32,
    pub final_set_tiebreak: bool,
    pub final_set_tiebreak_length: u32,
    pub golden_game: bool,
    pub golden_point: bool,
    pub windbreak: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::normalize(&SettingsInput::default())
    }
}

impl Settings {
    /// Normalize a loosely-typed settings object. Anything that is not an object
    /// yields the default rule set.
    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value::<SettingsInput>(value.clone()) {
            Ok(input) => Settings::normalize(&input),
            Err(_) => {
                log::debug!("settings payload is not an object, using defaults");
                Settings::default()
            }
        }
    }

    /// A single super set (to 8 games) with otherwise default rules.
    pub fn super_set() -> Self {
        Settings { sets: 1, is_super_set: true, ..Settings::default() }
    }

    fn normalize(input: &SettingsInput) -> Self {
        let super_flag = flag(input.is_super_set.as_ref(), false);
        let (sets, super_from_sets) = parse_sets(input.sets.as_ref());
        let is_super_set = super_flag || super_from_sets;

        Settings {
            sets: if is_super_set { 1 } else { sets },
            is_super_set,
            scoring_system: input
                .scoring_system
                .as_ref()
                .and_then(Value::as_str)
                .and_then(ScoringSystem::parse)
                .unwrap_or_default(),
            tiebreak_enabled: flag(input.tiebreak_enabled.as_ref(), true),
            tiebreak_type: parse_tiebreak_type(input.tiebreak_type.as_ref()),
            tiebreak_at: parse_tiebreak_at(input.tiebreak_at.as_ref()),
            final_set_tiebreak: flag(input.final_set_tiebreak.as_ref(), false),
            final_set_tiebreak_length: parse_final_length(input.final_set_tiebreak_length.as_ref()),
            golden_game: flag(input.golden_game.as_ref(), false),
            golden_point: flag(input.golden_point.as_ref(), false),
            windbreak: flag(input.windbreak.as_ref(), false),
        }
    }

    /// Sets a team needs to win the match. A two-set match is never decided 1-1:
    /// the split is played off, so the winner needs two.
    pub fn sets_to_win(&self) -> u32 {
        if self.sets == 2 {
            2
        } else {
            (u32::from(self.sets) + 1) / 2
        }
    }

    /// Games needed to take an ordinary set.
    pub fn games_to_win_set(&self) -> u32 {
        match self.scoring_system {
            ScoringSystem::Fast4 => 4,
            _ => 6,
        }
    }

    /// Game margin required for an ordinary set win.
    pub fn set_win_margin(&self) -> u32 {
        match self.scoring_system {
            ScoringSystem::Fast4 => 1,
            _ => 2,
        }
    }

    /// Canonical `"6-6"` form of the tiebreak trigger.
    pub fn tiebreak_at_label(&self) -> String {
        format!("{0}-{0}", self.tiebreak_at)
    }
}

/// Lenient wire form accepted on input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsInput {
    sets: Option<Value>,
    is_super_set: Option<Value>,
    scoring_system: Option<Value>,
    tiebreak_enabled: Option<Value>,
    tiebreak_type: Option<Value>,
    tiebreak_at: Option<Value>,
    final_set_tiebreak: Option<Value>,
    final_set_tiebreak_length: Option<Value>,
    golden_game: Option<Value>,
    golden_point: Option<Value>,
    windbreak: Option<Value>,
}

/// Any value is accepted: objects are normalized field by field, anything else
/// (null, a bare string, an array) yields the default rule set.
impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Settings::from_value(&value))
    }
}

/// Canonical wire form written by this crate.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    pub sets: u8,
    pub is_super_set: bool,
    pub scoring_system: ScoringSystem,
    pub tiebreak_enabled: bool,
    pub tiebreak_type: TiebreakType,
    /// e.g. "6-6"
    pub tiebreak_at: String,
    pub final_set_tiebreak: bool,
    pub final_set_tiebreak_length: u32,
    pub golden_game: bool,
    pub golden_point: bool,
    pub windbreak: bool,
}

impl From<Settings> for SettingsDocument {
    fn from(settings: Settings) -> Self {
        SettingsDocument {
            sets: settings.sets,
            is_super_set: settings.is_super_set,
            scoring_system: settings.scoring_system,
            tiebreak_enabled: settings.tiebreak_enabled,
            tiebreak_type: settings.tiebreak_type,
            tiebreak_at: settings.tiebreak_at_label(),
            final_set_tiebreak: settings.final_set_tiebreak,
            final_set_tiebreak_length: settings.final_set_tiebreak_length,
            golden_game: settings.golden_game,
            golden_point: settings.golden_point,
            windbreak: settings.windbreak,
        }
    }
}

impl JsonSchema for Settings {
    fn schema_name() -> String {
        "Settings".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        SettingsDocument::json_schema(gen)
    }
}

// ========================
// Field normalization
// ========================

fn flag(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => false,
            Some(1) => true,
            _ => default,
        },
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => default,
        },
        _ => default,
    }
}

fn as_count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Returns (sets, is_super_set).
fn parse_sets(value: Option<&Value>) -> (u8, bool) {
    if let Some(Value::String(s)) = value {
        if s.trim().eq_ignore_ascii_case("super") {
            return (1, true);
        }
    }
    match as_count(value) {
        Some(n @ (1 | 2 | 3 | 5)) => (n as u8, false),
        _ => (DEFAULT_SETS, false),
    }
}

fn parse_tiebreak_type(value: Option<&Value>) -> TiebreakType {
    match value {
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "championship" | "10" => TiebreakType::Championship,
            _ => TiebreakType::Regular,
        },
        Some(Value::Number(n)) if n.as_u64() == Some(10) => TiebreakType::Championship,
        _ => TiebreakType::Regular,
    }
}

fn parse_tiebreak_at(value: Option<&Value>) -> u32 {
    let games = match value {
        Some(Value::String(s)) => match s.trim().split_once('-') {
            Some((a, b)) if a.trim() == b.trim() => a.trim().parse::<u32>().ok(),
            Some(_) => None,
            None => s.trim().parse::<u32>().ok(),
        },
        Some(Value::Number(n)) => n.as_u64().map(|g| g as u32),
        _ => None,
    };
    match games {
        Some(g @ 4..=6) => g,
        _ => DEFAULT_TIEBREAK_AT,
    }
}

fn parse_final_length(value: Option<&Value>) -> u32 {
    match as_count(value) {
        Some(7) => 7,
        Some(10) => 10,
        _ => DEFAULT_FINAL_SET_TIEBREAK_LENGTH,
    }
}
