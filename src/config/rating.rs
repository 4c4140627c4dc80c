//! Rating ledger configuration

use crate::types::DEFAULT_POINTS;
use serde::{Deserialize, Serialize};

/// K-factor applied to matches of one team size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KFactor {
    pub mode: usize,
    pub k: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Points for new players and after a season reset
    pub default_points: i64,
    /// Per-mode K-factor table
    pub k_factors: Vec<KFactor>,
    /// K-factor for modes missing from the table
    pub default_k_factor: u32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_points: DEFAULT_POINTS,
            k_factors: vec![
                KFactor { mode: 1, k: 1 },
                KFactor { mode: 2, k: 1 },
                KFactor { mode: 3, k: 5 },
                KFactor { mode: 4, k: 10 },
                KFactor { mode: 5, k: 20 },
            ],
            default_k_factor: 10,
        }
    }
}

impl RatingConfig {
    /// Look up the K-factor for a team size
    pub fn k_factor(&self, mode: usize) -> u32 {
        self.k_factors
            .iter()
            .find(|entry| entry.mode == mode)
            .map(|entry| entry.k)
            .unwrap_or(self.default_k_factor)
    }
}
