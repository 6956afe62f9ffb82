//! Grid Snake - the classic snake game on a square grid, played in the terminal
//!
//! This library provides:
//! - Core game logic with an injectable tick scheduler (game module)
//! - High-score persistence (store module)
//! - Keyboard and mouse input mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod store;
