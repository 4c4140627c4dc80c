//! Service layer for the game-night core
//!
//! [`GameNight`] is the command-facing facade; [`AppState`] builds it from
//! configuration and owns startup and graceful shutdown.

pub mod app;
pub mod game_night;

pub use app::{AppState, ServiceError};
pub use game_night::GameNight;
