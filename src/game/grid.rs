use std::collections::HashSet;

use rand::Rng;

use super::state::Position;

/// Fixed-size 4-connected playing field and its static obstacles.
///
/// Snake cells are not stored here; callers pass the body when a query
/// needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub obstacles: HashSet<Position>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            obstacles: HashSet::new(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Position>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Uniformly random cell anywhere on the grid
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = rng.gen_range(0..self.width) as i32;
        let y = rng.gen_range(0..self.height) as i32;
        Position::new(x, y)
    }

    /// Random cell that is neither an obstacle nor in `occupied`.
    ///
    /// Retries until it succeeds; the config validation guarantees the
    /// grid has room.
    pub fn random_free_cell<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        occupied: &[Position],
    ) -> Position {
        loop {
            let pos = self.random_cell(rng);
            if !occupied.contains(&pos) && !self.is_obstacle(pos) {
                return pos;
            }
        }
    }

    /// Draw `count` samples off the snake and collect them as obstacles.
    ///
    /// Repeated samples collapse in the set, so the result can hold fewer
    /// than `count` cells.
    pub fn generate_obstacles<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        snake: &[Position],
    ) {
        self.obstacles.clear();
        for _ in 0..count {
            loop {
                let pos = self.random_cell(rng);
                if !snake.contains(&pos) {
                    self.obstacles.insert(pos);
                    break;
                }
            }
        }
    }
}
