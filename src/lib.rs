//! Path Snake - a terminal snake game played inside a live A* corridor
//!
//! This library provides:
//! - Core game logic: grid, path search, corridor and tick engine (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Per-process play statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
