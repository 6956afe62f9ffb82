//! High-score persistence

pub mod high_score;

pub use high_score::{FileScoreStore, HIGH_SCORE_KEY, MemoryScoreStore, ScoreStore};
