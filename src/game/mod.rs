//! Core game logic module for the path-following snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies:
//! the grid, the A* path search, the corridor that gates movement and the tick engine.

pub mod action;
pub mod config;
pub mod corridor;
pub mod engine;
pub mod grid;
pub mod pathfinder;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig, SearchConfig};
pub use corridor::{Corridor, Rgb, plasma_color};
pub use engine::{GameEngine, StepResult};
pub use grid::Grid;
pub use pathfinder::{PathFinder, SearchOptions};
pub use state::{GameState, MoveOutcome, Phase, Position, Snake};
