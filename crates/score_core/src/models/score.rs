use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::team::TeamId;

/// Value of one team's side of the current game.
///
/// Regular games step through 0/15/30/40 (plus `Advantage` under classic
/// scoring); tiebreaks use the raw counter. On the wire this is a bare number,
/// or the string `"Ad"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointValue {
    Count(u32),
    Advantage,
}

impl PointValue {
    pub const LOVE: PointValue = PointValue::Count(0);
    pub const FIFTEEN: PointValue = PointValue::Count(15);
    pub const THIRTY: PointValue = PointValue::Count(30);
    pub const FORTY: PointValue = PointValue::Count(40);

    /// Raw counter value. `Advantage` counts as one step past 40.
    pub fn count(self) -> u32 {
        match self {
            PointValue::Count(n) => n,
            PointValue::Advantage => 41,
        }
    }

    pub fn is_advantage(self) -> bool {
        matches!(self, PointValue::Advantage)
    }

    /// At (or, for malformed input, past) 40 without the advantage.
    pub fn is_forty(self) -> bool {
        matches!(self, PointValue::Count(n) if n >= 40)
    }

    /// Next value in a regular game, below 40.
    pub fn next_regular(self) -> PointValue {
        match self {
            PointValue::Count(n) if n < 15 => PointValue::FIFTEEN,
            PointValue::Count(n) if n < 30 => PointValue::THIRTY,
            _ => PointValue::FORTY,
        }
    }

    /// One step back in a regular game. Love stays at love.
    pub fn previous_regular(self) -> PointValue {
        match self {
            PointValue::Advantage => PointValue::FORTY,
            PointValue::Count(n) if n > 30 => PointValue::THIRTY,
            PointValue::Count(n) if n > 15 => PointValue::FIFTEEN,
            PointValue::Count(_) => PointValue::LOVE,
        }
    }
}

impl Default for PointValue {
    fn default() -> Self {
        PointValue::LOVE
    }
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PointValue::Count(n) => write!(f, "{}", n),
            PointValue::Advantage => f.write_str("Ad"),
        }
    }
}

impl Serialize for PointValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PointValue::Count(n) => serializer.serialize_u32(*n),
            PointValue::Advantage => serializer.serialize_str("Ad"),
        }
    }
}

impl<'de> Deserialize<'de> for PointValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(PointValue::Count(n)),
            Raw::Text(s) if s.trim().eq_ignore_ascii_case("ad") => Ok(PointValue::Advantage),
            Raw::Text(s) => s
                .trim()
                .parse::<u32>()
                .map(PointValue::Count)
                .map_err(|_| serde::de::Error::custom(format!("invalid point value: {s:?}"))),
        }
    }
}

impl JsonSchema for PointValue {
    fn schema_name() -> String {
        "PointValue".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        serde_json::Value::json_schema(gen)
    }
}

/// Point values of the game in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentGame {
    #[serde(default)]
    pub team_a: PointValue,
    #[serde(default)]
    pub team_b: PointValue,
}

impl CurrentGame {
    pub fn get(&self, team: TeamId) -> PointValue {
        match team {
            TeamId::TeamA => self.team_a,
            TeamId::TeamB => self.team_b,
        }
    }

    pub fn set(&mut self, team: TeamId, value: PointValue) {
        match team {
            TeamId::TeamA => self.team_a = value,
            TeamId::TeamB => self.team_b = value,
        }
    }

    pub fn total_count(&self) -> u32 {
        self.team_a.count() + self.team_b.count()
    }
}

/// Final points of a tiebreak, kept with the set it decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TiebreakScore {
    pub team_a: u32,
    pub team_b: u32,
}

/// Minimal per-game log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GameRecord {
    pub winner: TeamId,
}

/// A completed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub team_a: u32,
    pub team_b: u32,
    pub winner: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak: Option<TiebreakScore>,
}

impl SetRecord {
    pub fn games(&self, team: TeamId) -> u32 {
        match team {
            TeamId::TeamA => self.team_a,
            TeamId::TeamB => self.team_b,
        }
    }
}

/// The set in progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSet {
    #[serde(default)]
    pub team_a: u32,
    #[serde(default)]
    pub team_b: u32,
    #[serde(default)]
    pub games: Vec<GameRecord>,
    #[serde(default)]
    pub current_game: CurrentGame,
    #[serde(default)]
    pub is_tiebreak: bool,
    /// Tiebreak that stands in for a deciding set (or a deciding-set tiebreak),
    /// played to the final-set length.
    #[serde(default)]
    pub is_super_tiebreak: bool,
    /// Filled in when the set's tiebreak is won, then archived with the set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak: Option<TiebreakScore>,
}

impl CurrentSet {
    /// Set whose first point is already a deciding tiebreak.
    pub fn deciding_tiebreak() -> Self {
        CurrentSet { is_tiebreak: true, is_super_tiebreak: true, ..CurrentSet::default() }
    }

    pub fn games_for(&self, team: TeamId) -> u32 {
        match team {
            TeamId::TeamA => self.team_a,
            TeamId::TeamB => self.team_b,
        }
    }

    pub fn add_game(&mut self, team: TeamId) {
        match team {
            TeamId::TeamA => self.team_a += 1,
            TeamId::TeamB => self.team_b += 1,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.team_a + self.team_b
    }

    /// Team with more games, if any.
    pub fn leader(&self) -> Option<TeamId> {
        match self.team_a.cmp(&self.team_b) {
            std::cmp::Ordering::Greater => Some(TeamId::TeamA),
            std::cmp::Ordering::Less => Some(TeamId::TeamB),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn margin(&self) -> u32 {
        self.team_a.abs_diff(self.team_b)
    }
}

/// Sets won so far, the archive of completed sets and the set in progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    #[serde(default)]
    pub team_a: u32,
    #[serde(default)]
    pub team_b: u32,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
    #[serde(default)]
    pub current_set: Option<CurrentSet>,
}

impl Score {
    pub fn new() -> Self {
        Score { current_set: Some(CurrentSet::default()), ..Score::default() }
    }

    pub fn sets_for(&self, team: TeamId) -> u32 {
        match team {
            TeamId::TeamA => self.team_a,
            TeamId::TeamB => self.team_b,
        }
    }

    pub fn add_set(&mut self, team: TeamId) {
        match team {
            TeamId::TeamA => self.team_a += 1,
            TeamId::TeamB => self.team_b += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn test_point_value_wire_form() {
        assert_eq!(serde_json::to_string(&PointValue::FORTY).unwrap(), "40");
        assert_eq!(serde_json::to_string(&PointValue::Advantage).unwrap(), "\"Ad\"");

        let parsed: Vec<PointValue> = serde_json::from_str(r#"[0, "15", "Ad", 7]"#).unwrap();
        assert_eq!(
            parsed,
            vec![PointValue::LOVE, PointValue::FIFTEEN, PointValue::Advantage, PointValue::Count(7)]
        );
        assert!(serde_json::from_str::<PointValue>("\"deuce\"").is_err());
    }

    #[test]
    fn test_regular_progression() {
        assert_eq!(PointValue::LOVE.next_regular(), PointValue::FIFTEEN);
        assert_eq!(PointValue::FIFTEEN.next_regular(), PointValue::THIRTY);
        assert_eq!(PointValue::THIRTY.next_regular(), PointValue::FORTY);
        assert_eq!(PointValue::Advantage.previous_regular(), PointValue::FORTY);
        assert_eq!(PointValue::FIFTEEN.previous_regular(), PointValue::LOVE);
        assert_eq!(PointValue::LOVE.previous_regular(), PointValue::LOVE);
    }

    #[test]
    fn test_point_value_labels() {
        let labels: Vec<String> = [
            PointValue::LOVE,
            PointValue::FIFTEEN,
            PointValue::THIRTY,
            PointValue::FORTY,
            PointValue::Advantage,
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();
        assert_eq!(labels, vec!["0", "15", "30", "40", "Ad"]);
    }

    #[test]
    fn test_set_record_wire_shape() {
        let record = SetRecord {
            team_a: 7,
            team_b: 6,
            winner: TeamId::TeamA,
            tiebreak: Some(TiebreakScore { team_a: 7, team_b: 5 }),
        };
        assert_json_snapshot!(record, @r###"
        {
          "teamA": 7,
          "teamB": 6,
          "winner": "teamA",
          "tiebreak": {
            "teamA": 7,
            "teamB": 5
          }
        }
        "###);
    }

    #[test]
    fn test_current_set_leader() {
        let set = CurrentSet { team_a: 3, team_b: 5, ..CurrentSet::default() };
        assert_eq!(set.leader(), Some(TeamId::TeamB));
        assert_eq!(set.margin(), 2);
        assert_eq!(set.total_games(), 8);
        assert_eq!(CurrentSet::default().leader(), None);
    }
}
