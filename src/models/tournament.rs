//! Tournament records and the archived mirrors of the live structure.

use crate::models::fixture::{MatchId, RoundFormat};
use crate::models::player::PlayerId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a tournament row.
pub type TournamentId = i64;

/// How the tournament was played.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentType {
    /// Fixed fixture built by an organizer, archived from the live tables.
    #[default]
    InPerson,
    /// Open enrollment; every participant meets every other once.
    Online,
}

impl TournamentType {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentType::InPerson => "IN_PERSON",
            TournamentType::Online => "ONLINE",
        }
    }
}

/// A tournament record. Immutable once archived.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub month: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub tournament_type: TournamentType,
    pub format: Option<RoundFormat>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
}

/// Metadata for freezing the live tournament into the archive.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRequest {
    pub name: String,
    pub month: String,
    pub year: i32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchiveCreated {
    pub tournament_id: TournamentId,
}

/// A standings row frozen at archive time, with its computed final position.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchivedStanding {
    pub id: i64,
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub points: u32,
    pub total_points_scored: u32,
    pub total_matches: u32,
    pub final_position: u32,
    pub race_pb: Option<String>,
    pub race_bf: Option<String>,
}

/// An archived match. Player names are copied so the record stays readable after the roster changes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchivedMatch {
    pub id: MatchId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_name: String,
    pub player2_name: String,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub completed: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchivedRound {
    pub number: u32,
    pub format: RoundFormat,
    pub matches: Vec<ArchivedMatch>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchivedRounds {
    pub tournament_name: String,
    pub rounds: Vec<ArchivedRound>,
}

/// Per-player supplemental notes on an archived tournament (the race played in each format).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRace {
    pub id: i64,
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub race_pb: Option<String>,
    pub race_bf: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRaceUpdate {
    #[serde(default)]
    pub race_pb: Option<String>,
    #[serde(default)]
    pub race_bf: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A participant of an archived tournament with their totals.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchivedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub total_matches: u32,
    pub total_wins: u32,
    pub total_ties: u32,
    pub total_points_scored: u32,
}

/// Wins, ties and completed matches in one format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormatRecord {
    pub wins: u32,
    pub ties: u32,
    pub matches: u32,
}

/// One archived tournament from a single player's point of view.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerTournamentHistory {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub month: String,
    pub year: i32,
    pub final_position: u32,
    pub matches_played: u32,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub points: u32,
    pub total_points_scored: u32,
    pub race_pb: Option<String>,
    pub race_bf: Option<String>,
    pub pb: FormatRecord,
    pub bf: FormatRecord,
}
