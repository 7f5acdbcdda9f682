//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The presentation shell owns a [`GameState`] and drives it through a [`GameEngine`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, StepResult};
pub use state::{CollisionType, GameState, Position, Snake};
