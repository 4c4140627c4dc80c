//! Storage interfaces for players, matches, the rating ledger, champion picks
//! and seasons
//!
//! Every multi-record change the core makes goes through
//! [`GameStore::commit`] as a single [`CommitBatch`]. Match state transitions
//! are expressed as guarded [`MatchUpdate`]s that the store checks against
//! what it holds, not against the caller's copy.

pub mod memory;
pub mod stores;

// Re-export commonly used types
pub use memory::InMemoryGameStore;
pub use stores::{
    ChampionPickStore, CommitBatch, GameStore, MatchChange, MatchStore, MatchUpdate, PlayerStore,
    RatingHistoryStore, SeasonStore,
};
