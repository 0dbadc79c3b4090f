//! Match creation
//!
//! A `MatchSetup` is what the control UI submits when a match is scheduled.
//! Settings are normalized here, once; everything downstream reads the
//! normalized values.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::match_state::{CourtSides, Match, Server};
use super::score::Score;
use super::settings::Settings;
use super::team::{CourtSide, MatchFormat, Player, SportType, TeamId};
use crate::error::{Result, ScoreError};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchSetup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub sport: SportType,
    #[serde(default)]
    pub format: MatchFormat,
    #[validate(length(min = 1, max = 2))]
    pub team_a: Vec<Player>,
    #[validate(length(min = 1, max = 2))]
    pub team_b: Vec<Player>,
    #[serde(default)]
    pub settings: Settings,
    /// Team (and, in doubles, player) serving first. Defaults to team A, player 0.
    #[serde(default)]
    pub initial_server: Option<Server>,
    /// Side team A starts on. Defaults to left.
    #[serde(default)]
    pub team_a_side: Option<CourtSide>,
}

impl MatchSetup {
    pub fn new(format: MatchFormat, team_a: Vec<Player>, team_b: Vec<Player>) -> Self {
        MatchSetup {
            id: None,
            sport: SportType::default(),
            format,
            team_a,
            team_b,
            settings: Settings::default(),
            initial_server: None,
            team_a_side: None,
        }
    }

    pub fn singles(a: &str, b: &str) -> Self {
        MatchSetup::new(MatchFormat::Singles, vec![Player::new(a)], vec![Player::new(b)])
    }

    pub fn doubles(a: [&str; 2], b: [&str; 2]) -> Self {
        MatchSetup::new(
            MatchFormat::Doubles,
            a.iter().map(|name| Player::new(*name)).collect(),
            b.iter().map(|name| Player::new(*name)).collect(),
        )
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_server(mut self, team: TeamId, player_index: u8) -> Self {
        self.initial_server = Some(Server { team, player_index });
        self
    }

    /// Field-level validation plus roster size against the format.
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|e| ScoreError::InvalidSetup(e.to_string()))?;

        let expected = self.format.players_per_team();
        for (team, players) in [(TeamId::TeamA, &self.team_a), (TeamId::TeamB, &self.team_b)] {
            if players.len() != expected {
                return Err(ScoreError::InvalidTeamSize {
                    team,
                    expected,
                    found: players.len(),
                });
            }
            if let Some(player) = players.iter().find(|p| p.name.trim().is_empty()) {
                return Err(ScoreError::InvalidSetup(format!(
                    "{team} has a player without a name ({:?})",
                    player.id
                )));
            }
        }

        if let Some(server) = self.initial_server {
            if usize::from(server.player_index) >= expected {
                return Err(ScoreError::InvalidSetup(format!(
                    "server index {} out of range for {:?}",
                    server.player_index, self.format
                )));
            }
        }

        Ok(())
    }
}

/// Build the all-zero snapshot for a validated setup.
pub fn new_match(setup: MatchSetup) -> Result<Match> {
    setup.check()?;

    let id = setup
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut server = setup.initial_server.unwrap_or_default();
    if setup.format == MatchFormat::Singles {
        server.player_index = 0;
    }

    log::debug!(
        "created match {} ({:?}, {:?}, {} set(s), super_set={})",
        id,
        setup.sport,
        setup.format,
        setup.settings.sets,
        setup.settings.is_super_set
    );

    Ok(Match {
        id,
        sport: setup.sport,
        format: setup.format,
        settings: setup.settings,
        team_a: setup.team_a,
        team_b: setup.team_b,
        score: Score::new(),
        current_server: server,
        court_sides: CourtSides::with_team_a_on(setup.team_a_side.unwrap_or(CourtSide::Left)),
        should_change_sides: false,
        is_completed: false,
        winner: None,
    })
}
