//! Snake - a terminal Snake game on a fixed-tick loop
//!
//! This library provides:
//! - Core game logic (game module)
//! - Keyboard input and the command channel (input module)
//! - TUI rendering (render module)
//! - The interactive loop driver (modes module)
//! - Log file setup (logging module)

pub mod game;
pub mod input;
pub mod logging;
pub mod modes;
pub mod render;
