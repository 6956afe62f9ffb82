use super::{
    config::GameConfig,
    direction::Direction,
    scheduler::Scheduler,
    snapshot::Snapshot,
    state::{Cell, GameOverCause, GameState, Phase, Snake},
};
use crate::store::ScoreStore;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;

/// Final numbers of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: u32,
    /// High score after this game was counted
    pub high_score: u32,
    /// Whether this game set the high score
    pub new_record: bool,
    pub cause: GameOverCause,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing happened and no tick was scheduled
    Skipped,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the food and grew
    Ate { score: u32, speed_ms: u64 },
    /// The move ended the game
    GameOver(GameOverSummary),
}

/// The game engine that owns the game state and applies every rule
///
/// All changes go through the command methods ([`start`](Self::start),
/// [`toggle_pause`](Self::toggle_pause), [`reset`](Self::reset),
/// [`set_direction`](Self::set_direction)) and [`tick`](Self::tick). The
/// engine asks its [`Scheduler`] for the next tick instead of sleeping, and
/// keeps the high score in its [`ScoreStore`].
pub struct GameEngine<S: Scheduler, H: ScoreStore> {
    config: GameConfig,
    state: GameState,
    high_score: u32,
    scheduler: S,
    store: H,
    rng: StdRng,
}

impl<S: Scheduler, H: ScoreStore> GameEngine<S, H> {
    /// Create a new game engine with the given configuration
    ///
    /// The high score is read from `store` once, here. A store that cannot be
    /// read counts as holding 0.
    pub fn new(config: GameConfig, scheduler: S, store: H) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let high_score = match store.load() {
            Ok(high_score) => high_score,
            Err(err) => {
                log::warn!("Could not read high score, starting from 0: {:#}", err);
                0
            }
        };

        let state = fresh_state(&config, &mut rng);

        Self {
            config,
            state,
            high_score,
            scheduler,
            store,
            rng,
        }
    }

    /// Begin a game. Does nothing while a game is running or paused; after a
    /// game over the board is reset first.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            Phase::Running | Phase::Paused => return false,
            Phase::GameOver => self.reset(),
            Phase::Idle => {}
        }

        self.state.phase = Phase::Running;
        self.state.direction = Some(Direction::Right);
        self.state.pending_direction = None;
        self.scheduler.schedule_tick(Duration::ZERO);

        log::info!("Game started");
        true
    }

    /// Pause a running game or resume a paused one
    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            Phase::Running => {
                self.state.phase = Phase::Paused;
                log::info!("Game paused at score {}", self.state.score);
            }
            Phase::Paused => {
                self.state.phase = Phase::Running;
                self.scheduler.schedule_tick(Duration::ZERO);
                log::info!("Game resumed");
            }
            Phase::Idle | Phase::GameOver => return false,
        }
        true
    }

    /// Throw the current game away and set up a fresh board
    pub fn reset(&mut self) {
        self.state = fresh_state(&self.config, &mut self.rng);
        log::info!("Game reset");
    }

    /// Request a turn for the next tick
    ///
    /// Ignored unless the game is running and unpaused, and when `direction`
    /// equals or reverses the direction the snake is currently moving in.
    /// Several requests between two ticks: the last accepted one wins.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }

        if let Some(current) = self.state.direction {
            if direction == current || direction.is_opposite(current) {
                return false;
            }
        }

        self.state.pending_direction = Some(direction);
        true
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.phase != Phase::Running {
            return TickOutcome::Skipped;
        }

        if let Some(next) = self.state.pending_direction.take() {
            self.state.direction = Some(next);
        }

        let (dx, dy) = self.state.direction.map_or((0, 0), |d| d.delta());
        let new_head = self.state.snake.head().moved_by(dx, dy);

        if !new_head.is_within(self.config.tile_count) {
            return TickOutcome::GameOver(self.game_over(GameOverCause::Wall));
        }

        // The tail still counts: it has not moved out of the way yet
        if self.state.snake.occupies(new_head) {
            return TickOutcome::GameOver(self.game_over(GameOverCause::SelfCollision));
        }

        self.state.snake.push_head(new_head);

        let outcome = if self.state.food == Some(new_head) {
            self.eat()
        } else {
            self.state.snake.drop_tail();
            TickOutcome::Moved
        };

        if self.state.phase == Phase::Running {
            self.scheduler
                .schedule_tick(Duration::from_millis(self.state.speed_ms));
        }

        outcome
    }

    fn eat(&mut self) -> TickOutcome {
        let previous = self.state.score;
        self.state.score += self.config.food_reward;

        // Speed up whenever the score crosses a multiple of the interval
        let every = self.config.speed_up_every;
        if every > 0 && previous / every < self.state.score / every {
            self.state.speed_ms = self
                .state
                .speed_ms
                .saturating_sub(self.config.speed_step_ms)
                .max(self.config.min_speed_ms);
            log::debug!("Speed up to {}ms per tick", self.state.speed_ms);
        }

        self.state.food = spawn_food(&mut self.rng, &self.state.snake, &self.config);
        if self.state.food.is_none() {
            return TickOutcome::GameOver(self.game_over(GameOverCause::BoardFilled));
        }

        TickOutcome::Ate {
            score: self.state.score,
            speed_ms: self.state.speed_ms,
        }
    }

    fn game_over(&mut self, cause: GameOverCause) -> GameOverSummary {
        self.state.phase = Phase::GameOver;
        self.state.pending_direction = None;

        let final_score = self.state.score;
        let new_record = final_score > self.high_score;
        log::info!("Game over ({:?}) with score {}", cause, final_score);

        if new_record {
            self.high_score = final_score;
            match self.store.save(final_score) {
                Ok(()) => log::info!("New high score {}", final_score),
                Err(err) => log::warn!("Could not save high score {}: {:#}", final_score, err),
            }
        }

        GameOverSummary {
            final_score,
            high_score: self.high_score,
            new_record,
            cause,
        }
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.state.snake.body,
            food: self.state.food,
            tile_count: self.config.tile_count,
            cell_width: self.config.cell_width,
            show_grid: self.config.show_grid,
            score: self.state.score,
            high_score: self.high_score,
            speed_ms: self.state.speed_ms,
            phase: self.state.phase,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    /// Debug/test helper: replace the snake and its current direction.
    /// Food that would end up under the new snake is moved.
    pub fn debug_set_snake(&mut self, cells: &[Cell], direction: Option<Direction>) {
        let Some(snake) = Snake::from_cells(cells) else {
            return;
        };

        self.state.snake = snake;
        self.state.direction = direction;
        self.state.pending_direction = None;

        if self.state.food.is_none_or(|food| self.state.snake.occupies(food)) {
            self.state.food = spawn_food(&mut self.rng, &self.state.snake, &self.config);
        }
    }

    /// Debug/test helper: put the food on a specific cell
    pub fn debug_set_food(&mut self, cell: Cell) {
        self.state.food = Some(cell);
    }
}

fn fresh_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
    let snake = Snake::new(config.start_cell());
    let food = spawn_food(rng, &snake, config);
    GameState::new(snake, food, config.initial_speed_ms)
}

/// Pick a random free cell by drawing until one misses the snake.
/// `None` once the snake covers the whole board.
fn spawn_food(rng: &mut StdRng, snake: &Snake, config: &GameConfig) -> Option<Cell> {
    if snake.len() >= config.cell_count() {
        return None;
    }

    let tile_count = config.tile_count;

    loop {
        let x = rng.gen_range(0..tile_count) as i32;
        let y = rng.gen_range(0..tile_count) as i32;
        let cell = Cell::new(x, y);

        if !snake.occupies(cell) {
            return Some(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ManualScheduler;
    use crate::store::MemoryScoreStore;

    type TestEngine = GameEngine<ManualScheduler, MemoryScoreStore>;

    fn engine_with(config: GameConfig, store: MemoryScoreStore) -> TestEngine {
        let config = GameConfig {
            seed: Some(7),
            ..config
        };
        GameEngine::new(config, ManualScheduler::new(), store)
    }

    fn engine() -> TestEngine {
        engine_with(GameConfig::default(), MemoryScoreStore::new())
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        let state = engine.state();

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_ms, 150);
        assert_eq!(state.snake.body, vec![Cell::new(10, 10)]);
        assert_eq!(state.direction, None);

        let food = state.food.unwrap();
        assert!(food.is_within(20));
        assert_ne!(food, Cell::new(10, 10));
        assert_eq!(engine.scheduler().requests(), 0);
    }

    #[test]
    fn test_start_schedules_immediate_tick() {
        let mut engine = engine();

        assert!(engine.start());
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.state().direction, Some(Direction::Right));
        assert_eq!(engine.scheduler().pending(), Some(Duration::ZERO));

        // Already running
        assert!(!engine.start());
        assert_eq!(engine.scheduler().requests(), 1);
    }

    #[test]
    fn test_tick_reschedules_at_current_speed() {
        let mut engine = engine();
        engine.start();
        engine.debug_set_food(Cell::new(0, 0));
        engine.scheduler_mut().take();

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.scheduler().pending(), Some(Duration::from_millis(150)));
        assert_eq!(engine.state().snake.body, vec![Cell::new(11, 10)]);
    }

    #[test]
    fn test_tick_outside_running_is_skipped() {
        let mut engine = engine();
        assert_eq!(engine.tick(), TickOutcome::Skipped);
        assert_eq!(engine.state().snake.head(), Cell::new(10, 10));

        engine.start();
        engine.toggle_pause();
        engine.scheduler_mut().take();

        assert_eq!(engine.tick(), TickOutcome::Skipped);
        assert_eq!(engine.scheduler().pending(), None);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        engine.start();
        engine.debug_set_food(Cell::new(11, 10));

        let outcome = engine.tick();

        assert_eq!(
            outcome,
            TickOutcome::Ate {
                score: 10,
                speed_ms: 150
            }
        );
        let state = engine.state();
        assert_eq!(state.snake.body, vec![Cell::new(11, 10), Cell::new(10, 10)]);
        assert_eq!(state.score, 10);
        assert_eq!(state.speed_ms, 150);

        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_speed_ramps_every_fifty_points() {
        let mut engine = engine();
        engine.start();

        let mut speeds = Vec::new();
        for x in 1..=10 {
            engine.debug_set_snake(&[Cell::new(x - 1, 10)], Some(Direction::Right));
            engine.debug_set_food(Cell::new(x, 10));
            match engine.tick() {
                TickOutcome::Ate { speed_ms, .. } => speeds.push(speed_ms),
                other => panic!("expected to eat, got {:?}", other),
            }
        }

        assert_eq!(engine.score(), 100);
        assert_eq!(speeds[3], 150);
        assert_eq!(speeds[4], 140);
        assert_eq!(speeds[8], 140);
        assert_eq!(speeds[9], 130);
    }

    #[test]
    fn test_speed_never_below_floor() {
        let config = GameConfig {
            initial_speed_ms: 60,
            speed_up_every: 10,
            ..Default::default()
        };
        let mut engine = engine_with(config, MemoryScoreStore::new());
        engine.start();

        for x in 1..5 {
            engine.debug_set_snake(&[Cell::new(x - 1, 3)], Some(Direction::Right));
            engine.debug_set_food(Cell::new(x, 3));
            engine.tick();
        }

        assert_eq!(engine.state().speed_ms, 50);
    }

    #[test]
    fn test_speed_up_when_reward_skips_multiples() {
        let config = GameConfig {
            food_reward: 30,
            ..Default::default()
        };
        let mut engine = engine_with(config, MemoryScoreStore::new());
        engine.start();

        let mut speeds = Vec::new();
        for x in 1..=4 {
            engine.debug_set_snake(&[Cell::new(x - 1, 10)], Some(Direction::Right));
            engine.debug_set_food(Cell::new(x, 10));
            if let TickOutcome::Ate { speed_ms, .. } = engine.tick() {
                speeds.push(speed_ms);
            }
        }

        // 30, 60 (past 50), 90, 120 (past 100)
        assert_eq!(speeds, vec![150, 140, 140, 130]);
    }

    #[test]
    fn test_zero_speed_up_interval_keeps_speed() {
        let config = GameConfig {
            speed_up_every: 0,
            ..Default::default()
        };
        let mut engine = engine_with(config, MemoryScoreStore::new());
        engine.start();
        engine.debug_set_snake(&[Cell::new(10, 10)], Some(Direction::Right));
        engine.debug_set_food(Cell::new(11, 10));

        assert_eq!(
            engine.tick(),
            TickOutcome::Ate {
                score: 10,
                speed_ms: 150
            }
        );
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        engine.start();
        engine.scheduler_mut().take();
        engine.debug_set_snake(&[Cell::new(19, 10)], Some(Direction::Right));

        match engine.tick() {
            TickOutcome::GameOver(summary) => assert_eq!(summary.cause, GameOverCause::Wall),
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(!engine.is_running());
        assert_eq!(engine.scheduler().pending(), None);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine_with(GameConfig::small(), MemoryScoreStore::new());
        engine.start();

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5) heading right
        let body: Vec<Cell> = (1..=5).rev().map(|x| Cell::new(x, 5)).collect();
        engine.debug_set_snake(&body, Some(Direction::Right));
        engine.debug_set_food(Cell::new(9, 9));

        // Right, Down, Left, then Up back into the body
        engine.tick();
        assert!(engine.set_direction(Direction::Down));
        engine.tick();
        assert!(engine.set_direction(Direction::Left));
        engine.tick();
        assert!(engine.set_direction(Direction::Up));
        let outcome = engine.tick();

        match outcome {
            TickOutcome::GameOver(summary) => {
                assert_eq!(summary.cause, GameOverCause::SelfCollision)
            }
            other => panic!("expected game over, got {:?}", other),
        }
    }

    #[test]
    fn test_moving_onto_current_tail_is_fatal() {
        let mut engine = engine();
        engine.start();
        engine.debug_set_snake(
            &[
                Cell::new(5, 5),
                Cell::new(6, 5),
                Cell::new(6, 6),
                Cell::new(5, 6),
            ],
            Some(Direction::Left),
        );
        engine.debug_set_food(Cell::new(0, 0));

        assert!(engine.set_direction(Direction::Down));
        match engine.tick() {
            TickOutcome::GameOver(summary) => {
                assert_eq!(summary.cause, GameOverCause::SelfCollision)
            }
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(engine.state().snake.len(), 4);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();
        engine.start();
        engine.debug_set_snake(
            &[Cell::new(5, 5), Cell::new(5, 6), Cell::new(5, 7)],
            Some(Direction::Up),
        );

        assert!(!engine.set_direction(Direction::Down));
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.state().pending_direction, None);

        engine.tick();
        assert_eq!(engine.state().direction, Some(Direction::Up));
    }

    #[test]
    fn test_turns_are_checked_against_applied_direction() {
        let mut engine = engine();
        engine.start();
        engine.debug_set_food(Cell::new(0, 0));

        // Heading right: up is accepted, then left is still a reversal
        assert!(engine.set_direction(Direction::Up));
        assert!(!engine.set_direction(Direction::Left));
        assert!(engine.set_direction(Direction::Down));

        engine.tick();
        assert_eq!(engine.state().direction, Some(Direction::Down));
        assert_eq!(engine.state().snake.head(), Cell::new(10, 11));
    }

    #[test]
    fn test_direction_ignored_unless_running() {
        let mut engine = engine();
        assert!(!engine.set_direction(Direction::Up));

        engine.start();
        engine.toggle_pause();
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.state().pending_direction, None);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = engine();
        assert!(!engine.toggle_pause());

        engine.start();
        engine.scheduler_mut().take();

        assert!(engine.toggle_pause());
        assert!(engine.is_paused());
        assert!(engine.is_running());
        assert_eq!(engine.scheduler().pending(), None);

        assert!(engine.toggle_pause());
        assert!(!engine.is_paused());
        assert_eq!(engine.scheduler().pending(), Some(Duration::ZERO));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = engine();
        engine.start();
        engine.debug_set_food(Cell::new(11, 10));
        engine.tick();
        assert_eq!(engine.score(), 10);

        engine.reset();

        let state = engine.state();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_ms, 150);
        assert_eq!(state.snake.body, vec![Cell::new(10, 10)]);
        assert_eq!(state.direction, None);
        assert!(!state.snake.occupies(state.food.unwrap()));
    }

    #[test]
    fn test_start_after_game_over_resets() {
        let mut engine = engine();
        engine.start();
        engine.debug_set_snake(&[Cell::new(19, 10)], Some(Direction::Right));
        engine.tick();
        assert_eq!(engine.phase(), Phase::GameOver);

        assert!(engine.start());
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.state().snake.body, vec![Cell::new(10, 10)]);
    }

    #[test]
    fn test_high_score_saved_on_record() {
        let mut engine = engine_with(GameConfig::default(), MemoryScoreStore::with_high_score(10));
        assert_eq!(engine.high_score(), 10);

        engine.start();
        for x in 11..=12 {
            engine.debug_set_food(Cell::new(x, 10));
            engine.tick();
        }
        engine.debug_set_snake(&[Cell::new(19, 10)], Some(Direction::Right));
        let TickOutcome::GameOver(summary) = engine.tick() else {
            panic!("expected game over");
        };

        assert_eq!(summary.final_score, 20);
        assert_eq!(summary.high_score, 20);
        assert!(summary.new_record);
        assert_eq!(engine.store().stored(), Some(20));
        assert_eq!(engine.store().saves(), 1);

        // Equal score is not a new record
        engine.reset();
        engine.start();
        for x in 11..=12 {
            engine.debug_set_food(Cell::new(x, 10));
            engine.tick();
        }
        engine.debug_set_snake(&[Cell::new(19, 10)], Some(Direction::Right));
        let TickOutcome::GameOver(summary) = engine.tick() else {
            panic!("expected game over");
        };
        assert!(!summary.new_record);
        assert_eq!(engine.store().saves(), 1);
    }

    #[test]
    fn test_failed_save_keeps_high_score_in_memory() {
        let mut engine = engine_with(GameConfig::default(), MemoryScoreStore::failing());
        engine.start();
        engine.debug_set_food(Cell::new(11, 10));
        engine.tick();
        engine.debug_set_snake(&[Cell::new(19, 10)], Some(Direction::Right));
        engine.tick();

        assert_eq!(engine.high_score(), 10);
        assert_eq!(engine.store().stored(), None);
    }

    #[test]
    fn test_board_filled_ends_game() {
        let mut engine = engine_with(GameConfig::new(2), MemoryScoreStore::new());
        engine.start();
        engine.debug_set_snake(
            &[Cell::new(0, 1), Cell::new(1, 1), Cell::new(1, 0)],
            Some(Direction::Left),
        );
        engine.debug_set_food(Cell::new(0, 0));

        assert!(engine.set_direction(Direction::Up));
        match engine.tick() {
            TickOutcome::GameOver(summary) => {
                assert_eq!(summary.cause, GameOverCause::BoardFilled)
            }
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(engine.state().food, None);
        assert_eq!(engine.state().snake.len(), 4);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut engine = engine();
        engine.start();
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.snake, &[Cell::new(10, 10)]);
        assert_eq!(snapshot.tile_count, 20);
        assert_eq!(snapshot.cell_width, 2);
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.head(), Some(Cell::new(10, 10)));
        assert!(snapshot.is_running());
    }
}
