//! Player identity: the live fixture roster and the master roster used by online tournaments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row id of a player (live roster or master roster, depending on context).
pub type PlayerId = i64;

/// A player on the live roster (or the master roster; both share the shape).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a player; also the player half of a fixture payload.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub confirmed: bool,
}

impl NewPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confirmed: false,
        }
    }

    pub fn confirmed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confirmed: true,
        }
    }
}
