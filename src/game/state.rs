use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::config::GameConfig;
use super::direction::Direction;

/// A position on the board, in board units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position `step` units in a direction
    pub fn moved_in_direction(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }

    /// Grid cell (column, row) containing this position
    pub fn cell(&self, dot_size: i32) -> (i32, i32) {
        (self.x.div_euclid(dot_size), self.y.div_euclid(dot_size))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction the next move will take
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose segments trail behind `head`, `spacing` units apart
    pub fn new(head: Position, direction: Direction, length: usize, spacing: i32) -> Self {
        let mut body = vec![head];

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back, spacing));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Request a new direction. Reversing into the current direction is refused.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Shift every segment onto its predecessor and move the head `step` units.
    /// Returns the position the tail vacated.
    pub fn advance(&mut self, step: i32) -> Position {
        let new_head = self.head().moved_in_direction(self.direction, step);
        self.body.insert(0, new_head);

        // body is never empty here: we just inserted the head
        self.body.pop().unwrap_or(new_head)
    }

    /// Append a segment at `tail` unless the snake is already at `capacity`
    pub fn grow(&mut self, tail: Position, capacity: usize) -> bool {
        if self.body.len() >= capacity {
            return false;
        }
        self.body.push(tail);
        true
    }

    /// True if the head sits on a segment more than `skip` places behind it
    pub fn head_hits_body(&self, skip: usize) -> bool {
        let head = self.head();
        self.body.iter().skip(skip + 1).any(|segment| *segment == head)
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

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Position,
    pub board_extent: i32,
    pub score: u32,
    pub apples_eaten: u32,
    pub ticks: u32,
    /// Current period of the tick source
    pub tick_interval: Duration,
    /// False once a collision ended the game
    pub running: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, apple: Position, config: &GameConfig) -> Self {
        Self {
            snake,
            apple,
            board_extent: config.board_extent,
            score: 0,
            apples_eaten: 0,
            ticks: 0,
            tick_interval: config.initial_interval(),
            running: true,
        }
    }

    /// Check if a position is within the board
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.board_extent && pos.y >= 0 && pos.y < self.board_extent
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// Collision the head is currently in, if any
    pub fn detect_collision(&self, skip: usize) -> Option<CollisionType> {
        if !self.is_in_bounds(self.snake.head()) {
            return Some(CollisionType::Wall);
        }

        if self.snake.head_hits_body(skip) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_from(cells: &[(i32, i32)], direction: Direction) -> Snake {
        Snake {
            body: cells.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            direction,
        }
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(50, 50);
        assert_eq!(pos.moved_by(10, 0), Position::new(60, 50));
        assert_eq!(pos.moved_in_direction(Direction::Left, 10), Position::new(40, 50));
        assert_eq!(pos.moved_in_direction(Direction::Down, 10), Position::new(50, 60));
        assert_eq!(pos.moved_in_direction(Direction::Up, 10), Position::new(50, 40));
    }

    #[test]
    fn test_position_cell() {
        assert_eq!(Position::new(0, 0).cell(10), (0, 0));
        assert_eq!(Position::new(290, 50).cell(10), (29, 5));
        assert_eq!(Position::new(-10, 0).cell(10), (-1, 0));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(50, 50));
        assert_eq!(snake.body[1], Position::new(40, 50));
        assert_eq!(snake.body[2], Position::new(30, 50));
        assert_eq!(snake.direction, Direction::Right);
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);

        let vacated = snake.advance(10);
        assert_eq!(vacated, Position::new(30, 50));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(60, 50));
        assert_eq!(snake.body[1], Position::new(50, 50));
        assert_eq!(snake.body[2], Position::new(40, 50));
    }

    #[test]
    fn test_grow_takes_vacated_cell() {
        let mut snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);
        let vacated = snake.advance(10);

        assert!(snake.grow(vacated, 900));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body[3], Position::new(30, 50));
    }

    #[test]
    fn test_grow_respects_capacity() {
        let mut snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);
        assert!(!snake.grow(Position::new(20, 50), 3));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_turn_rejects_reversal() {
        let mut snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);
        assert!(!snake.turn(Direction::Left));
        assert_eq!(snake.direction, Direction::Right);

        assert!(snake.turn(Direction::Up));
        assert_eq!(snake.direction, Direction::Up);
    }

    #[test]
    fn test_turn_only_checks_current_direction() {
        let mut snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);

        // Both turns land before any move; each is checked against the
        // direction set just before it.
        assert!(snake.turn(Direction::Up));
        assert!(snake.turn(Direction::Left));
        assert_eq!(snake.direction, Direction::Left);

        assert!(!snake.turn(Direction::Right));
        assert_eq!(snake.direction, Direction::Left);
    }

    #[test]
    fn test_head_hits_body_skips_neck() {
        // Head coincides with index 3 only
        let snake = snake_from(
            &[(50, 50), (60, 50), (60, 60), (50, 50), (40, 60), (40, 70)],
            Direction::Right,
        );
        assert!(!snake.head_hits_body(4));

        // Head coincides with index 1
        let snake = snake_from(&[(50, 50), (50, 50), (40, 50), (30, 50)], Direction::Right);
        assert!(!snake.head_hits_body(4));

        // Head coincides with index 2
        let snake = snake_from(
            &[(50, 50), (60, 50), (50, 50), (40, 50), (30, 50), (20, 50)],
            Direction::Right,
        );
        assert!(!snake.head_hits_body(4));

        // Head coincides with index 4
        let snake = snake_from(
            &[(50, 50), (60, 50), (60, 60), (50, 60), (50, 50), (40, 50)],
            Direction::Right,
        );
        assert!(!snake.head_hits_body(4));

        // Head coincides with index 5
        let snake = snake_from(
            &[(50, 50), (60, 50), (60, 60), (50, 60), (40, 60), (50, 50)],
            Direction::Right,
        );
        assert!(snake.head_hits_body(4));
    }

    #[test]
    fn test_bounds_checking() {
        let config = GameConfig::default();
        let state = GameState::new(
            Snake::new(Position::new(50, 50), Direction::Right, 3, 10),
            Position::new(100, 100),
            &config,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(290, 290)));
        assert!(!state.is_in_bounds(Position::new(-10, 0)));
        assert!(!state.is_in_bounds(Position::new(300, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 300)));
        assert!(!state.is_in_bounds(Position::new(0, -10)));
    }

    #[test]
    fn test_detect_collision() {
        let config = GameConfig::default();
        let mut state = GameState::new(
            Snake::new(Position::new(50, 50), Direction::Right, 3, 10),
            Position::new(100, 100),
            &config,
        );
        assert_eq!(state.detect_collision(4), None);
        assert!(state.is_occupied_by_snake(Position::new(40, 50)));

        state.snake.body[0] = Position::new(300, 50);
        assert_eq!(state.detect_collision(4), Some(CollisionType::Wall));

        state.snake = snake_from(
            &[(50, 50), (60, 50), (60, 60), (50, 60), (40, 60), (40, 50), (50, 50)],
            Direction::Left,
        );
        assert_eq!(state.detect_collision(4), Some(CollisionType::SelfCollision));
    }
}
