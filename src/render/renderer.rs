use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, GameOverSummary, Snapshot};
use crate::metrics::GameMetrics;

const HEAD_GLYPH: &str = "■";
const BODY_GLYPH: &str = "□";
const FOOD_GLYPH: &str = "●";
const GRID_GLYPH: &str = "·";

/// Paints a game snapshot. Holds no state: the same inputs always produce
/// the same frame.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the whole screen and return the inner area of the board, which
    /// pointer input is measured against.
    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        game_over: Option<&GameOverSummary>,
    ) -> Rect {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        let tiles = u16::try_from(snapshot.tile_count).unwrap_or(u16::MAX);
        let board_width = tiles.saturating_mul(snapshot.cell_width).saturating_add(2);
        let board_height = tiles.saturating_add(2);
        let board_area = centered(chunks[1], board_width, board_height);

        let board = self.render_grid(snapshot);
        frame.render_widget(board, board_area);

        if let Some(summary) = game_over {
            let popup_area = centered(chunks[1], 36, 9);
            frame.render_widget(Clear, popup_area);
            frame.render_widget(self.render_game_over(summary), popup_area);
        }

        let controls = self.render_controls(snapshot, game_over.is_some());
        frame.render_widget(controls, chunks[2]);

        Block::default().borders(Borders::ALL).inner(board_area)
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let (title, border_color) = if snapshot.is_paused() {
            (" Snake - PAUSED ", Color::Yellow)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(grid_lines(snapshot)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border_color))
                .title(title),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("High Score: ", label),
            Span::styled(snapshot.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", snapshot.speed_ms), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, summary: &GameOverSummary) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    summary.final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    summary.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
        ];

        if summary.new_record {
            text.push(Line::from(Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            text.push(Line::from(""));
        }

        text.push(Line::from(vec![
            Span::styled("Enter", key_style(Color::Green)),
            Span::styled(" play again  ", Style::default().fg(Color::Gray)),
            Span::styled("R", key_style(Color::Cyan)),
            Span::styled(" reset", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, snapshot: &Snapshot, game_over_shown: bool) -> Paragraph<'static> {
        let disabled = Style::default().fg(Color::DarkGray);

        let start = if snapshot.is_running() {
            vec![
                Span::styled("Enter", disabled),
                Span::styled(" start", disabled),
            ]
        } else {
            let label = if game_over_shown { " play again" } else { " start" };
            vec![Span::styled("Enter", key_style(Color::Green)), Span::raw(label)]
        };

        // Pause turns into a highlighted Resume while paused
        let pause = if !snapshot.is_running() {
            vec![
                Span::styled("Space", disabled),
                Span::styled(" pause", disabled),
            ]
        } else if snapshot.is_paused() {
            vec![
                Span::styled("Space", key_style(Color::Green)),
                Span::styled(" resume", Style::default().fg(Color::Green)),
            ]
        } else {
            vec![
                Span::styled("Space", key_style(Color::Gray)),
                Span::raw(" pause"),
            ]
        };

        let mut spans = start;
        spans.push(Span::raw(" | "));
        spans.extend(pause);
        spans.extend([
            Span::raw(" | "),
            Span::styled("R", key_style(Color::Cyan)),
            Span::raw(" reset | "),
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" or click to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// One line per board row. Every cell is `cell_width` columns wide: its
/// glyph followed by padding.
pub fn grid_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let width = snapshot.cell_width.max(1) as usize;
    let head = snapshot.head();

    let mut lines = Vec::with_capacity(snapshot.tile_count);
    for y in 0..snapshot.tile_count {
        let mut spans = Vec::with_capacity(snapshot.tile_count);

        for x in 0..snapshot.tile_count {
            let cell = Cell::new(x as i32, y as i32);

            let (glyph, style) = if Some(cell) == head {
                (
                    HEAD_GLYPH,
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                )
            } else if snapshot.snake.contains(&cell) {
                (BODY_GLYPH, Style::default().fg(Color::Green))
            } else if snapshot.food == Some(cell) {
                (
                    FOOD_GLYPH,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else if snapshot.show_grid {
                (GRID_GLYPH, Style::default().fg(Color::DarkGray))
            } else {
                (" ", Style::default())
            };

            spans.push(Span::styled(format!("{:<width$}", glyph), style));
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// A `width` x `height` rect centered in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
