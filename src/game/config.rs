use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Width of the playing field in cells
pub const GRID_WIDTH: usize = 40;
/// Height of the playing field in cells
pub const GRID_HEIGHT: usize = 30;
/// Fastest tick rate that still leaves a whole millisecond per tick
pub const MAX_TICK_RATE_HZ: u32 = 1000;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tuning of the A* search used to build the corridor spine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Seed the cell ahead of the snake into the frontier before searching
    pub prefer_forward: bool,
    /// Let the search walk through the tail cell, which vacates on the next move
    pub exclude_trailing_body: bool,
}

/// Configuration for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    #[serde(skip, default = "default_grid_width")]
    pub grid_width: usize,
    /// Height of the game grid
    #[serde(skip, default = "default_grid_height")]
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Number of obstacles placed when obstacles are enabled
    pub obstacle_count: usize,
    /// Corridor half-width around each path waypoint
    pub corridor_width: i32,
    /// Delay before the first path is computed and the corridor activates
    pub path_delay_ms: u64,
    /// Game ticks per second
    pub tick_rate_hz: u32,
    /// Points awarded per food
    pub food_score: u32,
    pub search: SearchConfig,
}

fn default_grid_width() -> usize {
    GRID_WIDTH
}

fn default_grid_height() -> usize {
    GRID_HEIGHT
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            initial_snake_length: 1,
            obstacle_count: 15,
            corridor_width: 3,
            path_delay_ms: 5000,
            tick_rate_hz: 8,
            food_score: 10,
            search: SearchConfig::default(),
        }
    }
}

impl GameConfig {
    /// Same tunables on a different grid. Used by tests and embedders;
    /// the terminal game always plays on the fixed grid.
    pub fn with_grid(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Load a JSON config file. Missing fields fall back to defaults;
    /// call [`GameConfig::validate`] before use.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Check the tunables, including that the grid has room for the snake,
    /// every obstacle and one food cell. Placement loops retry until they
    /// find a free cell, so this is the only capacity guard.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid("grid must not be empty".into()));
        }
        if self.tick_rate_hz == 0 || self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_hz must be between 1 and {MAX_TICK_RATE_HZ}"
            )));
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "initial_snake_length must be at least 1".into(),
            ));
        }
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(ConfigError::Invalid(format!(
                "initial_snake_length {} does not fit left of the grid centre",
                self.initial_snake_length
            )));
        }
        if self.corridor_width < 0 {
            return Err(ConfigError::Invalid(
                "corridor_width must not be negative".into(),
            ));
        }

        let cells = self.grid_width * self.grid_height;
        let needed = self.initial_snake_length + self.obstacle_count + 1;
        if needed > cells {
            return Err(ConfigError::Invalid(format!(
                "grid has {cells} cells but snake, obstacles and food need {needed}"
            )));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.tick_rate_hz.max(1)))
    }

    pub fn path_delay(&self) -> Duration {
        Duration::from_millis(self.path_delay_ms)
    }
}
