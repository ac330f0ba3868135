//! Standings rows: live projection and the ranked copy frozen into an archive.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// One player's aggregate performance in the live tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Player id (live roster).
    pub id: PlayerId,
    pub name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub points: u32,
    /// Sum of the player's own scores (games won).
    pub total_points_scored: u32,
    /// Sum of games played over all completed matches.
    pub total_matches: u32,
}

impl Standing {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }
}
