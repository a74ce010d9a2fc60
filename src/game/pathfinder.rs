//! A* search over the 4-connected grid.
//!
//! The frontier is an ordered set keyed by `(f, rank, cell)`. A cell enters
//! the frontier once; when a cheaper route to it is found its entry is
//! re-keyed in place and keeps its original rank, so equal f-scores are
//! always resolved in favour of the cell that was discovered first.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::action::Direction;
use super::grid::Grid;
use super::state::Position;

/// Expansion order for neighbours of the current cell
const NEIGHBOUR_ORDER: [Direction; 4] = [
    Direction::Down,
    Direction::Up,
    Direction::Right,
    Direction::Left,
];

/// Manhattan distance between two cells
pub fn manhattan(a: Position, b: Position) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Knobs for a single search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Treat the tail cell as free because it vacates on the next move
    pub exclude_trailing_body: bool,
    /// Seed the cell in this direction from the start before searching
    pub preferred_direction: Option<Direction>,
}

type FrontierKey = (u32, u64, Position);

/// Shortest-path search bound to one grid and one snake body
pub struct PathFinder<'a> {
    grid: &'a Grid,
    blocked: HashSet<Position>,
    preferred_direction: Option<Direction>,
}

impl<'a> PathFinder<'a> {
    /// `body` is head-first. The head is never blocked since it is the
    /// search start; the tail is released when `exclude_trailing_body` is set.
    pub fn new(grid: &'a Grid, body: &[Position], options: SearchOptions) -> Self {
        let end = if options.exclude_trailing_body && body.len() > 1 {
            body.len() - 1
        } else {
            body.len()
        };
        let blocked = body.get(1..end).unwrap_or(&[]).iter().copied().collect();
        Self {
            grid,
            blocked,
            preferred_direction: options.preferred_direction,
        }
    }

    fn is_walkable(&self, pos: Position) -> bool {
        self.grid.is_in_bounds(pos) && !self.grid.is_obstacle(pos) && !self.blocked.contains(&pos)
    }

    /// Path from `start` to `target`, both included.
    ///
    /// When the target cannot be reached the direct pair `[start, target]`
    /// is returned instead; it is not contiguous and the corridor built on
    /// it ends the run soon after.
    pub fn compute_path(&self, start: Position, target: Position) -> Vec<Position> {
        match self.search(start, target) {
            Some(path) => {
                tracing::debug!(%start, %target, len = path.len(), "path found");
                path
            }
            None => {
                tracing::warn!(%start, %target, "no valid path found, using direct path");
                vec![start, target]
            }
        }
    }

    /// Plain A*; `None` when the frontier runs dry before reaching `target`
    pub fn search(&self, start: Position, target: Position) -> Option<Vec<Position>> {
        let mut frontier: BTreeSet<FrontierKey> = BTreeSet::new();
        let mut open: HashMap<Position, (u32, u64)> = HashMap::new();
        let mut g_score: HashMap<Position, u32> = HashMap::new();
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut closed: HashSet<Position> = HashSet::new();
        let mut next_rank: u64 = 0;

        let mut push = |frontier: &mut BTreeSet<FrontierKey>,
                        open: &mut HashMap<Position, (u32, u64)>,
                        cell: Position,
                        f: u32| {
            match open.get_mut(&cell) {
                Some((old_f, rank)) => {
                    frontier.remove(&(*old_f, *rank, cell));
                    *old_f = f;
                    frontier.insert((f, *rank, cell));
                }
                None => {
                    open.insert(cell, (f, next_rank));
                    frontier.insert((f, next_rank, cell));
                    next_rank += 1;
                }
            }
        };

        g_score.insert(start, 0);
        push(&mut frontier, &mut open, start, manhattan(start, target));

        if let Some(direction) = self.preferred_direction {
            let ahead = start.moved_in_direction(direction);
            if self.is_walkable(ahead) {
                g_score.insert(ahead, 1);
                came_from.insert(ahead, start);
                push(&mut frontier, &mut open, ahead, 1 + manhattan(ahead, target));
            }
        }

        while let Some((_, _, current)) = frontier.pop_first() {
            open.remove(&current);

            if current == target {
                return Some(reconstruct(&came_from, current));
            }

            closed.insert(current);
            let current_g = g_score.get(&current).copied().unwrap_or(0);

            for direction in NEIGHBOUR_ORDER {
                let neighbour = current.moved_in_direction(direction);
                if !self.is_walkable(neighbour) || closed.contains(&neighbour) {
                    continue;
                }

                let tentative_g = current_g + 1;
                if g_score
                    .get(&neighbour)
                    .is_some_and(|&known| tentative_g >= known)
                {
                    continue;
                }

                came_from.insert(neighbour, current);
                g_score.insert(neighbour, tentative_g);
                push(
                    &mut frontier,
                    &mut open,
                    neighbour,
                    tentative_g + manhattan(neighbour, target),
                );
            }
        }

        None
    }
}

fn reconstruct(came_from: &HashMap<Position, Position>, target: Position) -> Vec<Position> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// True when every consecutive pair is one unit step apart on one axis
pub fn is_contiguous(path: &[Position]) -> bool {
    path.windows(2).all(|pair| manhattan(pair[0], pair[1]) == 1)
}
