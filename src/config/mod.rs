//! Configuration management for the game-night service
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod monitor;
pub mod rating;
pub mod teams;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ChampionSettings, RiotSettings, ServiceSettings};
pub use monitor::MonitorConfig;
pub use rating::{KFactor, RatingConfig};
pub use teams::BalancerConfig;
