//! Live-game service access
//!
//! The monitor only depends on [`LiveGameClient`]; [`RiotClient`] is the HTTP
//! implementation and [`MockLiveGameClient`] replays scripted answers.

pub mod client;
pub mod types;

// Re-export commonly used types
pub use client::{LiveGameClient, LiveGameError, MockLiveGameClient, RiotClient};
pub use types::{ActiveGame, LiveParticipant, RiotAccount};
