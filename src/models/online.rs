//! Online (open-enrollment) tournaments: participants and their generated pairings.

use crate::models::fixture::{MatchId, RoundFormat};
use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OnlineTournamentRequest {
    pub name: String,
    pub month: String,
    pub year: i32,
    #[serde(default)]
    pub format: Option<RoundFormat>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Master roster ids, in the order that fixes match numbering.
    pub player_ids: Vec<PlayerId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OnlineTournamentCreated {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub format: Option<RoundFormat>,
    pub players_added: usize,
    pub matches_generated: usize,
}

/// A generated pairing. Names are copied from the master roster at creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OnlineMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_name: String,
    pub player2_name: String,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub completed: bool,
    pub match_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OnlineStanding {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub points: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OnlineScoreRecorded {
    pub match_id: MatchId,
    /// e.g. `"Ana 2-1 Bruno"`.
    pub score: String,
}
