use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the snake ate the apple this tick
    pub ate_apple: bool,
    /// Whether the game has ended; the tick source should stop
    pub terminated: bool,
    /// Type of collision if one occurred this tick
    pub collision: Option<CollisionType>,
    /// Whether the tick interval changed; the tick source should re-arm
    pub speed_changed: bool,
}

impl StepResult {
    fn frozen() -> Self {
        Self {
            ate_apple: false,
            terminated: true,
            collision: None,
            speed_changed: false,
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create an engine seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose apple placement is reproducible
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the starting state: a short snake heading right and a random apple
    pub fn initialize(&mut self) -> GameState {
        let snake = Snake::new(
            Position::new(self.config.start_x, self.config.start_y),
            Direction::Right,
            self.config.initial_length,
            self.config.dot_size,
        );

        let apple = self.locate_apple(None);
        debug!(x = apple.x, y = apple.y, "initial apple placed");

        GameState::new(snake, apple, &self.config)
    }

    /// Request a direction change for the next tick.
    ///
    /// Returns false when the request reverses the snake or the game is over.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if !state.running {
            return false;
        }

        let accepted = state.snake.turn(direction);
        if accepted {
            debug!(?direction, "direction changed");
        } else {
            debug!(?direction, current = ?state.snake.direction, "reversal ignored");
        }
        accepted
    }

    /// Advance the game by one move
    pub fn tick(&mut self, state: &mut GameState) -> StepResult {
        if !state.running {
            return StepResult::frozen();
        }

        let vacated = state.snake.advance(self.config.dot_size);
        state.ticks += 1;

        let ate_apple = state.snake.head() == state.apple;
        if ate_apple {
            self.eat_apple(state, vacated);
        }

        let collision = state.detect_collision(self.config.collision_skip);
        if let Some(kind) = collision {
            state.running = false;
            info!(
                ?kind,
                score = state.score,
                length = state.snake.len(),
                ticks = state.ticks,
                "game over"
            );
        }

        // No ramp once the game has ended
        let speed_changed = ate_apple && state.running && self.speed_up(state);

        StepResult {
            ate_apple,
            terminated: !state.running,
            collision,
            speed_changed,
        }
    }

    fn eat_apple(&mut self, state: &mut GameState, vacated: Position) {
        if !state.snake.grow(vacated, self.config.max_segments) {
            debug!(length = state.snake.len(), "snake at capacity, not growing");
        }
        state.apples_eaten += 1;
        state.score += self.config.apple_score;
        state.apple = self.locate_apple(Some(state.apple));

        info!(
            score = state.score,
            apples = state.apples_eaten,
            length = state.snake.len(),
            "apple eaten"
        );
    }

    /// Shrink the tick interval on every `apples_per_speedup`-th apple
    fn speed_up(&self, state: &mut GameState) -> bool {
        let per = self.config.apples_per_speedup;
        if state.apples_eaten == 0 || per == 0 || state.apples_eaten % per != 0 {
            return false;
        }

        let next = state
            .tick_interval
            .saturating_sub(self.config.interval_step())
            .max(self.config.min_interval());
        if next == state.tick_interval {
            return false;
        }

        state.tick_interval = next;
        info!(interval_ms = next.as_millis() as u64, "speed increased");
        true
    }

    /// Pick a random grid cell for the apple. The snake body is not avoided,
    /// only the cell the apple was just eaten from.
    fn locate_apple(&mut self, previous: Option<Position>) -> Position {
        let cells = self.config.grid_cells();
        loop {
            let x = self.rng.gen_range(0..cells) * self.config.dot_size;
            let y = self.rng.gen_range(0..cells) * self.config.dot_size;
            let pos = Position::new(x, y);

            if Some(pos) != previous {
                return pos;
            }
        }
    }
}
