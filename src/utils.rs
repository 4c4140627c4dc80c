//! Utility functions for the game-night core

use crate::types::{MatchId, Player};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique match ID
pub fn generate_match_id() -> MatchId {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: f64, rating2: f64) -> f64 {
    (rating1 - rating2).abs()
}

/// Arithmetic mean of the players' points, 0.0 for an empty slice
pub fn mean_points(players: &[&Player]) -> f64 {
    if players.is_empty() {
        return 0.0;
    }
    players.iter().map(|p| p.points as f64).sum::<f64>() / players.len() as f64
}
