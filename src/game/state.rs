use std::fmt;
use std::time::{Duration, Instant};

use super::action::Direction;
use super::grid::Grid;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
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

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Turn towards `direction` unless that would reverse the snake.
    /// Returns whether the heading changed.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) || self.direction == direction {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Cell the head would enter on the next move
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    /// Check if position is occupied by any segment, tail included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head; drop the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
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

/// What happened to the snake on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Head left the grid
    OutOfBounds,
    /// Head ran into the body
    SelfCollision,
    /// Head ran into an obstacle
    ObstacleCollision,
    /// Head left the active corridor
    OffCorridor,
    /// Body shifted by one cell
    Moved,
    /// Head reached the food; body grew by one
    Grew,
}

impl MoveOutcome {
    /// Every failure is equally fatal to the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MoveOutcome::Moved | MoveOutcome::Grew)
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MoveOutcome::OutOfBounds => "hit the wall",
            MoveOutcome::SelfCollision => "bit itself",
            MoveOutcome::ObstacleCollision => "hit an obstacle",
            MoveOutcome::OffCorridor => "left the path",
            MoveOutcome::Moved => "moved",
            MoveOutcome::Grew => "ate food",
        };
        f.write_str(label)
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the Y/N obstacle answer; nothing moves
    ChoosingObstacles,
    Playing,
    /// Board frozen until restart
    GameOver(MoveOutcome),
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid: Grid,
    /// Corridor spine from the head to the food; empty until the first trigger
    pub path: Vec<Position>,
    /// Whether the delayed initial path has been computed
    pub path_generated: bool,
    pub score: u32,
    pub steps: u32,
    pub phase: Phase,
    pub started_at: Instant,
    pub path_delay: Duration,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid: Grid, started_at: Instant) -> Self {
        Self {
            snake,
            food,
            grid,
            path: Vec::new(),
            path_generated: false,
            score: 0,
            steps: 0,
            phase: Phase::Playing,
            started_at,
            path_delay: Duration::ZERO,
        }
    }

    pub fn with_path_delay(mut self, path_delay: Duration) -> Self {
        self.path_delay = path_delay;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.grid.is_in_bounds(pos)
    }

    /// Whole seconds left before the corridor activates (rounded up),
    /// or `None` once the path exists or outside play.
    pub fn countdown_secs(&self, now: Instant) -> Option<u64> {
        if self.path_generated || !self.is_playing() {
            return None;
        }
        let remaining = self
            .path_delay
            .saturating_sub(now.saturating_duration_since(self.started_at));
        Some(remaining.as_millis().div_ceil(1000) as u64)
    }

    /// Whether the delayed first path is due at `now`
    pub fn path_due(&self, now: Instant) -> bool {
        !self.path_generated && now.saturating_duration_since(self.started_at) >= self.path_delay
    }
}
