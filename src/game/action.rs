/// Heading of the snake on the 4-connected grid (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// A turn onto `other` would fold the head back into the neck
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit step `(dx, dy)`
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Action applied at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Turn towards a direction (ignored if it reverses the snake)
    Move(Direction),
    /// Keep the current heading
    Continue,
}

impl From<Option<Direction>> for Action {
    fn from(pending: Option<Direction>) -> Self {
        pending.map(Action::Move).unwrap_or(Action::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Right.is_opposite(Direction::Right));
    }

    #[test]
    fn test_opposite_deltas_cancel() {
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
        assert_eq!(Direction::Up.delta(), (0, -1));
    }

    #[test]
    fn test_pending_direction_into_action() {
        assert_eq!(Action::from(None), Action::Continue);
        assert_eq!(
            Action::from(Some(Direction::Left)),
            Action::Move(Direction::Left)
        );
    }
}
