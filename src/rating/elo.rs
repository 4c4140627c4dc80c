//! Team-level Elo arithmetic
//!
//! Each team is treated as one combined rating (its mean points at formation
//! time), and every teammate receives the same delta.

use skillratings::elo::{expected_score, EloRating};

/// Probability that the winning side was expected to win
pub fn expected_win_probability(winning_rating: f64, losing_rating: f64) -> f64 {
    let (expected, _) = expected_score(
        &EloRating {
            rating: winning_rating,
        },
        &EloRating {
            rating: losing_rating,
        },
    );
    expected
}

/// Points moved from the losing to the winning side, never less than 1
pub fn point_change(k_factor: u32, winning_rating: f64, losing_rating: f64) -> i64 {
    let expected = expected_win_probability(winning_rating, losing_rating);
    let raw = (f64::from(k_factor) * (1.0 - expected)).round_ties_even() as i64;
    raw.max(1)
}
