use super::direction::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check if the cell lies on a square board of `tile_count` cells per side
    pub fn is_within(&self, tile_count: usize) -> bool {
        let limit = tile_count as i32;
        (0..limit).contains(&self.x) && (0..limit).contains(&self.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Cell>,
}

impl Snake {
    /// A one-cell snake
    pub fn new(head: Cell) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from explicit segments, head first. Returns `None` for an
    /// empty list.
    pub fn from_cells(cells: &[Cell]) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        Some(Self {
            body: cells.to_vec(),
        })
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Check if any segment, head and tail included, sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Add a new head in front of the current one
    pub fn push_head(&mut self, head: Cell) {
        self.body.insert(0, head);
    }

    /// Drop the last segment. A one-cell snake keeps its only cell.
    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No free cell left for food
    BoardFilled,
}

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh board, waiting for start
    Idle,
    Running,
    Paused,
    /// Ended; only reset (or start, which resets) leaves this phase
    GameOver,
}

/// Complete state of one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction applied on the last tick; `None` before the first start
    pub direction: Option<Direction>,
    /// Direction requested since the last tick
    pub pending_direction: Option<Direction>,
    pub food: Option<Cell>,
    pub score: u32,
    /// Delay between ticks in milliseconds
    pub speed_ms: u64,
    pub phase: Phase,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Option<Cell>, speed_ms: u64) -> Self {
        Self {
            snake,
            direction: None,
            pending_direction: None,
            food,
            score: 0,
            speed_ms,
            phase: Phase::Idle,
        }
    }

    /// Running or paused
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }
}
