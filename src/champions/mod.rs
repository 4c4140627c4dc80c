//! Champion catalog
//!
//! The catalog is an injected, explicitly refreshable value: it caches the
//! champion list of the latest published version and hands every draw its own
//! disposable copy.

pub mod catalog;
pub mod source;

// Re-export commonly used types
pub use catalog::ChampionCatalog;
pub use source::{ChampionSource, DataDragonSource, StaticChampionSource};
