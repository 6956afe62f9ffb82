use std::time::{Duration, Instant};

/// Per-session play statistics shown next to the board
///
/// Play time only advances while a game is actually running; pauses and
/// the game-over screen do not count.
pub struct GameMetrics {
    played: Duration,
    running_since: Option<Instant>,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            played: Duration::ZERO,
            running_since: None,
            games_played: 0,
        }
    }

    pub fn on_game_start(&mut self) {
        self.played = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    pub fn on_pause(&mut self) {
        self.stop_clock();
    }

    pub fn on_resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_game_over(&mut self) {
        self.stop_clock();
        self.games_played += 1;
    }

    pub fn on_reset(&mut self) {
        self.played = Duration::ZERO;
        self.running_since = None;
    }

    /// Play time of the current game
    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.played + since.elapsed(),
            None => self.played,
        }
    }

    pub fn format_time(&self) -> String {
        format_duration(self.elapsed())
    }

    fn stop_clock(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.played += since.elapsed();
        }
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// `MM:SS`; minutes keep counting past 59
pub fn format_duration(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
