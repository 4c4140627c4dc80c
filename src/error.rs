//! Error types for the game-night core
//!
//! Fallible operations return `anyhow::Result`; domain failures are raised as
//! [`GameNightError`] values so callers can recover them with `downcast_ref`.

use crate::types::{MatchId, PlayerId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific game-night scenarios
#[derive(Debug, thiserror::Error)]
pub enum GameNightError {
    #[error("Invalid player pool size: {size} (must be even and at least 2)")]
    InvalidPoolSize { size: usize },

    #[error("Champion pool exhausted: draft needs {required}, catalog has {available}")]
    ChampionPoolExhausted { required: usize, available: usize },

    #[error("Invalid match mode: {mode} (team size must be between 1 and 5)")]
    InvalidMatchMode { mode: usize },

    #[error("Match {match_id} already has a result")]
    AlreadyFinalized { match_id: MatchId },

    #[error("Match {match_id} has no result to revert")]
    NotFinalized { match_id: MatchId },

    #[error("Champions of match {match_id} are already registered")]
    ChampionsAlreadyRegistered { match_id: MatchId },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: MatchId },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("Player {player_id} appears more than once in the pool")]
    DuplicatePlayer { player_id: PlayerId },

    #[error("External service error: {message}")]
    ExternalServiceError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl GameNightError {
    /// Shorthand for the poisoned-lock failure every store shares
    pub fn lock_poisoned(what: &str) -> Self {
        GameNightError::InternalError {
            message: format!("Failed to acquire {} lock", what),
        }
    }
}
