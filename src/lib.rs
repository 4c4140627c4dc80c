//! Game Night - team balancing, rating ledger and live-match monitoring
//!
//! This crate holds the core of a community game-night bot: it splits a pool
//! of players into two balanced teams with a random champion draft, keeps an
//! Elo-like rating ledger that can be finalized and reverted per match, and
//! watches the live-game service until a drawn match actually starts.

pub mod champions;
pub mod config;
pub mod error;
pub mod monitor;
pub mod rating;
pub mod riot;
pub mod service;
pub mod storage;
pub mod teams;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{GameNightError, Result};
pub use types::*;

// Re-export key components
pub use champions::ChampionCatalog;
pub use monitor::{MatchMonitor, MonitorOutcome, MonitorState};
pub use rating::RatingEngine;
pub use service::GameNight;
pub use storage::{GameStore, InMemoryGameStore};
pub use teams::TeamBalancer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
