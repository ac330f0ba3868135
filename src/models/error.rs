//! Errors returned by every fixture, score and archive operation.

use thiserror::Error;

/// Error taxonomy for tournament operations.
///
/// Whenever one of these is returned from a store operation, the transaction it ran in
/// has already been rolled back: nothing the call attempted is visible.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Malformed or missing input; fix the request and retry.
    #[error("{0}")]
    Validation(String),
    /// Input a pure helper cannot work with (e.g. fewer than two participants to pair).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A referenced player name or id does not resolve.
    #[error("player not found: {0}")]
    UnknownPlayer(String),
    /// The targeted row does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// The store failed mid-operation.
    #[error("database error: {0}")]
    Transaction(#[from] rusqlite::Error),
}

impl TournamentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
