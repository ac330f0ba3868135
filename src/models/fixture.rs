//! Rounds, matches and the declarative fixture payload that rebuilds them.

use crate::models::player::{NewPlayer, PlayerId};
use crate::models::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type RoundId = i64;
pub type MatchId = i64;

/// Game format played in a round.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum RoundFormat {
    #[serde(rename = "PB")]
    Pb,
    #[serde(rename = "BF")]
    Bf,
}

impl RoundFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundFormat::Pb => "PB",
            RoundFormat::Bf => "BF",
        }
    }
}

impl std::fmt::Display for RoundFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RoundFormat {
    type Error = TournamentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PB" => Ok(RoundFormat::Pb),
            "BF" => Ok(RoundFormat::Bf),
            other => Err(TournamentError::validation(format!(
                "format must be PB or BF (got {other:?})"
            ))),
        }
    }
}

/// A live round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub round_number: u32,
    pub format: RoundFormat,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A live match. `completed` is true exactly when both scores are set.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round_id: RoundId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A live match with round and player names resolved, for display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub id: MatchId,
    pub round_number: u32,
    pub format: RoundFormat,
    pub player1_name: String,
    pub player2_name: String,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixtureRound {
    pub number: u32,
    pub format: RoundFormat,
    pub matches: Vec<MatchDetail>,
}

/// The whole live fixture, rounds in order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub rounds: Vec<FixtureRound>,
}

/// One side-by-side pairing in a fixture payload, by player name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub player1_name: String,
    pub player2_name: String,
}

impl Matchup {
    pub fn new(player1_name: impl Into<String>, player2_name: impl Into<String>) -> Self {
        Self {
            player1_name: player1_name.into(),
            player2_name: player2_name.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundPlan {
    #[serde(alias = "number")]
    pub round_number: u32,
    pub format: RoundFormat,
    pub matches: Vec<Matchup>,
}

/// Declarative payload that replaces the entire live fixture.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixturePlan {
    pub players: Vec<NewPlayer>,
    pub rounds: Vec<RoundPlan>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixtureSummary {
    pub players_created: usize,
    pub rounds_created: usize,
    pub matches_created: usize,
}

/// Request body for a score update. Unsigned, so negative scores never deserialize.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub score1: u32,
    pub score2: u32,
}

/// Per-player, per-match derived statistics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStat {
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub games_played: u32,
    pub games_won: u32,
}
