use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use super::timer::{TickTimer, wait_for};
use crate::game::{Direction, GameConfig, GameEngine, GameOverSummary, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::store::FileScoreStore;

pub type TerminalEngine = GameEngine<TickTimer, FileScoreStore>;

/// Interactive play in the terminal
///
/// Binds keys and clicks to engine commands, keeps the game-over screen in
/// sync with the engine, and drives ticks from the engine's [`TickTimer`].
pub struct HumanMode {
    engine: TerminalEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Set while the game-over screen is shown
    game_over: Option<GameOverSummary>,
    /// Board area from the last frame, for click steering
    grid_area: Rect,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: FileScoreStore) -> Self {
        Self {
            engine: GameEngine::new(config, TickTimer::new(), store),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            game_over: None,
            grid_area: Rect::default(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            let deadline = self.engine.scheduler().deadline();

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick, whenever the engine asked for one
                _ = wait_for(deadline) => {
                    self.engine.scheduler_mut().clear();
                    self.on_tick();
                    self.draw(terminal)?;
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let snapshot = self.engine.snapshot();
        let renderer = &self.renderer;
        let metrics = &self.metrics;
        let game_over = self.game_over.as_ref();
        let mut grid_area = self.grid_area;

        terminal
            .draw(|frame| {
                grid_area = renderer.render(frame, &snapshot, metrics, game_over);
            })
            .context("Failed to draw frame")?;

        self.grid_area = grid_area;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply(action);
            }
            Event::Mouse(mouse) => {
                let cell_width = self.engine.config().cell_width;
                if let Some(direction) =
                    self.input_handler
                        .handle_mouse_event(mouse, self.grid_area, cell_width)
                {
                    self.steer(direction);
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Steer(direction) => self.steer(direction),
            KeyAction::TogglePause => self.toggle_pause(),
            KeyAction::Start => {
                if self.game_over.is_some() {
                    self.play_again();
                } else if self.engine.start() {
                    self.metrics.on_game_start();
                }
            }
            KeyAction::Reset => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn steer(&mut self, direction: Direction) {
        if !self.engine.is_running() || self.engine.is_paused() {
            return;
        }
        self.engine.set_direction(direction);
    }

    fn toggle_pause(&mut self) {
        if !self.engine.toggle_pause() {
            return;
        }
        if self.engine.is_paused() {
            self.metrics.on_pause();
        } else {
            self.metrics.on_resume();
        }
    }

    fn on_tick(&mut self) {
        match self.engine.tick() {
            TickOutcome::GameOver(summary) => {
                self.metrics.on_game_over();
                self.game_over = Some(summary);
            }
            TickOutcome::Ate { .. } | TickOutcome::Moved | TickOutcome::Skipped => {}
        }
    }

    fn reset_game(&mut self) {
        self.game_over = None;
        self.engine.reset();
        self.metrics.on_reset();
    }

    fn play_again(&mut self) {
        self.reset_game();
        if self.engine.start() {
            self.metrics.on_game_start();
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
