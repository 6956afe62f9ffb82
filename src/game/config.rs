use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::state::Cell;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each side of the square board
    pub tile_count: usize,
    /// Terminal columns used to draw one cell
    pub cell_width: u16,
    /// Draw a dot in every empty cell
    pub show_grid: bool,

    /// Delay between ticks at the start of a game
    pub initial_speed_ms: u64,
    /// The delay never drops below this
    pub min_speed_ms: u64,
    /// How much the delay shrinks on each speed-up
    pub speed_step_ms: u64,
    /// Speed up every time the score crosses a multiple of this; 0 never speeds up
    pub speed_up_every: u32,
    /// Points awarded per food eaten
    pub food_reward: u32,

    /// Fixed RNG seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            cell_width: 2,
            show_grid: true,
            initial_speed_ms: 150,
            min_speed_ms: 50,
            speed_step_ms: 10,
            speed_up_every: 50,
            food_reward: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.tile_count >= 2, "tile_count must be at least 2");
        ensure!(
            self.tile_count <= i32::MAX as usize,
            "tile_count {} is too large",
            self.tile_count
        );
        ensure!(self.cell_width > 0, "cell_width must be positive");
        ensure!(self.min_speed_ms > 0, "min_speed_ms must be positive");
        ensure!(
            self.min_speed_ms <= self.initial_speed_ms,
            "min_speed_ms ({}) exceeds initial_speed_ms ({})",
            self.min_speed_ms,
            self.initial_speed_ms
        );
        ensure!(self.food_reward > 0, "food_reward must be positive");
        ensure!(self.speed_up_every > 0, "speed_up_every must be positive");
        Ok(())
    }

    /// Where a new snake starts: the middle of the board
    pub fn start_cell(&self) -> Cell {
        let center = (self.tile_count / 2) as i32;
        Cell::new(center, center)
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.tile_count * self.tile_count
    }
}
