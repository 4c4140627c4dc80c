//! Match monitor configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling cadence and lifetime of the live match monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between two live-game queries
    pub poll_interval_seconds: u64,
    /// Give up confirming a match after this long
    pub timeout_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 30,
            timeout_seconds: 20 * 60,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
