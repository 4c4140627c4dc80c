//! Team balancer configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Upper bound of the "closest matches" pool the final split is drawn from
    pub closest_pool_cap: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            closest_pool_cap: 10,
        }
    }
}
