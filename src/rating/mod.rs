//! Rating ledger
//!
//! This module applies and reverses Elo-like point changes when a match is
//! decided, binds confirmed champion picks to a match, resets seasons and
//! derives player statistics from the stored history.

pub mod elo;
pub mod engine;
pub mod stats;

// Re-export commonly used types
pub use elo::{expected_win_probability, point_change};
pub use engine::{ChampionRegistration, RatingEngine, RatingOutcome, RevertOutcome};
pub use stats::{compute_player_stats, PlayerStats};
