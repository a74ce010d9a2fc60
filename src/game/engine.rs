use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    corridor::Corridor,
    grid::Grid,
    pathfinder::{PathFinder, SearchOptions},
    state::{GameState, MoveOutcome, Phase, Position, Snake},
};

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// What the snake did, `None` when the session was not in play
    pub outcome: Option<MoveOutcome>,
    /// Whether the run has ended
    pub terminated: bool,
    /// Whether the path was regenerated during this step
    pub path_recomputed: bool,
}

impl StepResult {
    fn idle(state: &GameState) -> Self {
        Self {
            outcome: None,
            terminated: state.is_game_over(),
            path_recomputed: false,
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    /// Y/N answer from the menu, remembered across restarts
    obstacles_enabled: Option<bool>,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Deterministic engine for tests and replays
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            obstacles_enabled: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn obstacles_enabled(&self) -> Option<bool> {
        self.obstacles_enabled
    }

    /// Answer the obstacle question up front so sessions skip the menu
    pub fn preselect_obstacles(&mut self, enabled: bool) {
        self.obstacles_enabled = Some(enabled);
    }

    /// Build a fresh session. It waits on the obstacle menu until the
    /// choice has been made once.
    pub fn reset(&mut self, now: Instant) -> GameState {
        let center = Position::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        let snake = Snake::new(center, Direction::Right, self.config.initial_snake_length);

        let mut grid = Grid::new(self.config.grid_width, self.config.grid_height);
        if self.obstacles_enabled == Some(true) {
            grid.generate_obstacles(&mut self.rng, self.config.obstacle_count, &snake.body);
        }
        let food = grid.random_free_cell(&mut self.rng, &snake.body);

        let mut state =
            GameState::new(snake, food, grid, now).with_path_delay(self.config.path_delay());
        if self.obstacles_enabled.is_none() {
            state.phase = Phase::ChoosingObstacles;
        } else {
            tracing::info!(
                obstacles = state.grid.obstacles.len(),
                %food,
                "session started"
            );
        }
        state
    }

    /// Record the menu answer and start playing
    pub fn choose_obstacles(&mut self, state: &mut GameState, enabled: bool, now: Instant) {
        if state.phase != Phase::ChoosingObstacles {
            return;
        }
        tracing::info!(enabled, "obstacle choice made");
        self.obstacles_enabled = Some(enabled);
        *state = self.reset(now);
    }

    /// Start over after a game over, keeping the obstacle choice
    pub fn restart(&mut self, state: &mut GameState, now: Instant) {
        if !state.is_game_over() {
            return;
        }
        *state = self.reset(now);
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState, action: Action, now: Instant) -> StepResult {
        if !state.is_playing() {
            return StepResult::idle(state);
        }

        if let Action::Move(direction) = action {
            state.snake.turn(direction);
        }

        let mut path_recomputed = false;
        if state.path_due(now) {
            self.recompute_path(state);
            state.path_generated = true;
            path_recomputed = true;
            tracing::info!(
                head = %state.snake.head(),
                food = %state.food,
                len = state.path.len(),
                "initial path generated"
            );
        }

        let new_head = state.snake.next_head();
        if let Some(outcome) = self.check_collision(state, new_head) {
            state.phase = Phase::GameOver(outcome);
            state.steps += 1;
            tracing::info!(score = state.score, at = %new_head, %outcome, "game over");

            return StepResult {
                outcome: Some(outcome),
                terminated: true,
                path_recomputed,
            };
        }

        let ate_food = new_head == state.food;
        state.snake.advance(new_head, ate_food);
        state.steps += 1;

        let outcome = if ate_food {
            state.score += self.config.food_score;
            state.food = state.grid.random_free_cell(&mut self.rng, &state.snake.body);
            tracing::debug!(score = state.score, food = %state.food, "food eaten");
            self.recompute_path(state);
            path_recomputed = true;
            MoveOutcome::Grew
        } else {
            MoveOutcome::Moved
        };

        StepResult {
            outcome: Some(outcome),
            terminated: false,
            path_recomputed,
        }
    }

    /// Check if the new head position ends the run
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<MoveOutcome> {
        if !state.is_in_bounds(pos) {
            return Some(MoveOutcome::OutOfBounds);
        }

        if state.snake.occupies(pos) {
            return Some(MoveOutcome::SelfCollision);
        }

        if state.grid.is_obstacle(pos) {
            return Some(MoveOutcome::ObstacleCollision);
        }

        if !self.corridor(state).contains(pos) {
            return Some(MoveOutcome::OffCorridor);
        }

        None
    }

    /// Corridor that gates movement; inactive until the delayed first path
    pub fn corridor<'a>(&self, state: &'a GameState) -> Corridor<'a> {
        let path: &[Position] = if state.path_generated { &state.path } else { &[] };
        Corridor::new(path, self.config.corridor_width)
    }

    /// Replace the path with a fresh search from the current head to the food
    fn recompute_path(&self, state: &mut GameState) {
        let options = SearchOptions {
            exclude_trailing_body: self.config.search.exclude_trailing_body,
            preferred_direction: self
                .config
                .search
                .prefer_forward
                .then_some(state.snake.direction),
        };
        let finder = PathFinder::new(&state.grid, &state.snake.body, options);
        state.path = finder.compute_path(state.snake.head(), state.food);
    }
}
