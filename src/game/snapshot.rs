use super::state::{Cell, Phase};

/// Read-only view of a game handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<'a> {
    /// Snake segments, head first
    pub snake: &'a [Cell],
    pub food: Option<Cell>,
    pub tile_count: usize,
    /// Terminal columns per cell
    pub cell_width: u16,
    pub show_grid: bool,
    pub score: u32,
    pub high_score: u32,
    pub speed_ms: u64,
    pub phase: Phase,
}

impl Snapshot<'_> {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }
}
