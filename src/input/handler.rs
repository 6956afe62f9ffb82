use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    TogglePause,
    /// Start a game, or play again from the game-over screen
    Start,
    Reset,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                KeyAction::TogglePause
            }
            KeyCode::Enter => KeyAction::Start,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Reset,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Turn a left click inside the board into a direction, the terminal
    /// stand-in for a touch on the board.
    ///
    /// `grid` is the board's inner area on screen and `cell_width` the number
    /// of columns per cell, used to make both axes count in cells.
    pub fn handle_mouse_event(
        &self,
        mouse: MouseEvent,
        grid: Rect,
        cell_width: u16,
    ) -> Option<Direction> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        if !grid.contains(Position::new(mouse.column, mouse.row)) {
            return None;
        }

        let center_x = grid.x as f32 + grid.width as f32 / 2.0;
        let center_y = grid.y as f32 + grid.height as f32 / 2.0;

        let dx = (mouse.column as f32 + 0.5 - center_x) / cell_width.max(1) as f32;
        let dy = mouse.row as f32 + 0.5 - center_y;

        classify_swipe(dx, dy)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick a direction from a displacement by its dominant axis. Ties go to the
/// vertical axis; no displacement at all gives no direction.
pub fn classify_swipe(dx: f32, dy: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else if dy < 0.0 {
        Some(Direction::Up)
    } else {
        None
    }
}
