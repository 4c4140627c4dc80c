//! Balanced team formation
//!
//! Splits an even player pool into two skill-balanced halves, picks one of the
//! closest splits at random and deals each side a champion draft.

pub mod balancer;
pub mod draft;

// Re-export commonly used types
pub use balancer::{closest_pool_size, enumerate_splits, Split, TeamBalancer};
pub use draft::{draft_champions, draft_iterations};
