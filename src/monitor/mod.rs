//! Match monitoring
//!
//! After a match is drawn a single background task polls the live-game service
//! until the whole roster shows up in one game, then binds the champions they
//! are playing to the match.

pub mod match_monitor;

// Re-export commonly used types
pub use match_monitor::{MatchMonitor, MonitorOutcome, MonitorState};
