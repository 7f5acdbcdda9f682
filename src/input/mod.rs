//! Keyboard input: key mapping and the command channel feeding the game loop

pub mod commands;
pub mod handler;

pub use commands::{forward_commands, spawn_input_reader, Command};
pub use handler::{InputHandler, KeyAction};
