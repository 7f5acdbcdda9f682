use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed parameters of the game.
///
/// Distances are in logical board units: the board is `board_extent` units
/// square and every position is a multiple of `dot_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width and height of the board
    pub board_extent: i32,
    /// Size of one grid cell, and the distance moved per tick
    pub dot_size: i32,
    /// Upper bound on the number of snake segments
    pub max_segments: usize,
    /// Initial length of the snake
    pub initial_length: usize,
    /// Head position of a fresh snake
    pub start_x: i32,
    pub start_y: i32,

    // Progression
    /// Points awarded per apple
    pub apple_score: u32,
    /// Tick interval at startup, in milliseconds
    pub initial_interval_ms: u64,
    /// Amount the interval shrinks per speed-up
    pub interval_step_ms: u64,
    /// The interval never drops below this
    pub min_interval_ms: u64,
    /// A speed-up happens every time this many apples have been eaten
    pub apples_per_speedup: u32,

    /// Segments right behind the head that never count as self-collision
    pub collision_skip: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_extent: 300,
            dot_size: 10,
            max_segments: 900,
            initial_length: 3,
            start_x: 50,
            start_y: 50,
            apple_score: 10,
            initial_interval_ms: 140,
            interval_step_ms: 10,
            min_interval_ms: 50,
            apples_per_speedup: 5,
            collision_skip: 4,
        }
    }
}

impl GameConfig {
    /// Number of grid cells along each axis
    pub fn grid_cells(&self) -> i32 {
        self.board_extent / self.dot_size
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn interval_step(&self) -> Duration {
        Duration::from_millis(self.interval_step_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}
