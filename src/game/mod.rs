//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Ticks are requested through a [`Scheduler`] and the high score lives behind a
//! [`ScoreStore`](crate::store::ScoreStore), so the whole engine can be driven
//! synchronously from tests.

pub mod config;
pub mod direction;
pub mod engine;
pub mod scheduler;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, GameOverSummary, TickOutcome};
pub use scheduler::{ManualScheduler, Scheduler};
pub use snapshot::Snapshot;
pub use state::{Cell, GameOverCause, GameState, Phase, Snake};
