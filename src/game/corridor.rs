//! The safe corridor around the current path and its gradient colouring.

use super::pathfinder::manhattan;
use super::state::Position;

/// 8-bit RGB triple, kept free of any rendering crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Thickened view over a path. An empty path means the corridor is
/// inactive and every cell is allowed.
#[derive(Debug, Clone, Copy)]
pub struct Corridor<'a> {
    path: &'a [Position],
    width: i32,
}

impl<'a> Corridor<'a> {
    pub fn new(path: &'a [Position], width: i32) -> Self {
        Self { path, width }
    }

    pub fn is_active(&self) -> bool {
        !self.path.is_empty()
    }

    /// Whether `cell` may be entered.
    ///
    /// A cell qualifies when it is within Chebyshev distance `width` of a
    /// waypoint, or inside the box spanned by two consecutive waypoints
    /// grown by `width` on every side.
    pub fn contains(&self, cell: Position) -> bool {
        if self.path.is_empty() {
            return true;
        }

        let near_waypoint = self.path.iter().any(|&waypoint| self.near(cell, waypoint));
        near_waypoint
            || self
                .path
                .windows(2)
                .any(|segment| self.in_segment_box(cell, segment[0], segment[1]))
    }

    /// Cells the renderer paints: the square of radius `width` around each
    /// waypoint.
    pub fn is_painted(&self, cell: Position) -> bool {
        self.path.iter().any(|&waypoint| self.near(cell, waypoint))
    }

    fn near(&self, cell: Position, waypoint: Position) -> bool {
        (cell.x - waypoint.x).abs() <= self.width && (cell.y - waypoint.y).abs() <= self.width
    }

    fn in_segment_box(&self, cell: Position, a: Position, b: Position) -> bool {
        let (min_x, max_x) = (a.x.min(b.x) - self.width, a.x.max(b.x) + self.width);
        let (min_y, max_y) = (a.y.min(b.y) - self.width, a.y.max(b.y) + self.width);
        (min_x..=max_x).contains(&cell.x) && (min_y..=max_y).contains(&cell.y)
    }

    /// Normalised position `t` of the waypoint nearest to `cell`.
    ///
    /// Ties go to the earliest waypoint. An empty path reports 0.
    pub fn progress(&self, cell: Position) -> f32 {
        let Some(index) = self.nearest_index(cell) else {
            return 0.0;
        };
        let last = self.path.len().saturating_sub(1).max(1);
        index as f32 / last as f32
    }

    fn nearest_index(&self, cell: Position) -> Option<usize> {
        self.path
            .iter()
            .enumerate()
            .min_by_key(|(index, waypoint)| (manhattan(**waypoint, cell), *index))
            .map(|(index, _)| index)
    }

    /// Gradient colour for a cell, `None` while the corridor is inactive
    pub fn color_at(&self, cell: Position) -> Option<Rgb> {
        self.is_active().then(|| plasma_color(self.progress(cell)))
    }
}

/// Piecewise-linear approximation of the plasma colour map:
/// blue, purple, red, orange, yellow across `t` in `[0, 1]`.
pub fn plasma_color(t: f32) -> Rgb {
    let (r, g, b) = if t < 0.25 {
        (t * 4.0 * 128.0, 0.0, 255.0)
    } else if t < 0.5 {
        let s = (t - 0.25) * 4.0;
        (128.0 + s * 127.0, 0.0, 255.0 - (s * 255.0).trunc())
    } else if t < 0.75 {
        (255.0, (t - 0.5) * 4.0 * 165.0, 0.0)
    } else {
        (255.0, 165.0 + (t - 0.75) * 4.0 * 90.0, 0.0)
    };
    Rgb(channel(r), channel(g), channel(b))
}

fn channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(len: i32) -> Vec<Position> {
        (0..len).map(|x| Position::new(10 + x, 10)).collect()
    }

    #[test]
    fn test_empty_path_allows_everything() {
        let corridor = Corridor::new(&[], 3);
        assert!(!corridor.is_active());
        assert!(corridor.contains(Position::new(0, 0)));
        assert!(corridor.contains(Position::new(-5, 99)));
        assert_eq!(corridor.color_at(Position::new(1, 1)), None);
    }

    #[test]
    fn test_radius_around_waypoints() {
        let path = straight_path(3);
        let corridor = Corridor::new(&path, 3);

        assert!(corridor.contains(Position::new(10, 13)));
        assert!(corridor.contains(Position::new(7, 7)));
        assert!(corridor.contains(Position::new(15, 7)));
        assert!(!corridor.contains(Position::new(10, 14)));
        assert!(!corridor.contains(Position::new(6, 10)));
        assert!(!corridor.contains(Position::new(16, 10)));
    }

    #[test]
    fn test_segment_box_covers_gap_between_distant_waypoints() {
        let path = vec![Position::new(0, 0), Position::new(20, 10)];
        let corridor = Corridor::new(&path, 3);

        // Far from both endpoints but inside the grown box
        let middle = Position::new(10, 5);
        assert!(!corridor.is_painted(middle));
        assert!(corridor.contains(middle));
        assert!(corridor.contains(Position::new(23, 13)));
        assert!(!corridor.contains(Position::new(24, 5)));
        assert!(!corridor.contains(Position::new(-4, 0)));
    }

    #[test]
    fn test_progress_endpoints_and_monotonic() {
        let path = straight_path(8);
        let corridor = Corridor::new(&path, 3);

        assert_eq!(corridor.progress(path[0]), 0.0);
        assert_eq!(corridor.progress(path[7]), 1.0);

        let mut previous = 0.0;
        for cell in &path {
            let t = corridor.progress(*cell);
            assert!(t >= previous);
            assert!((0.0..=1.0).contains(&t));
            previous = t;
        }
    }

    #[test]
    fn test_progress_uses_nearest_waypoint() {
        let path = straight_path(5);
        let corridor = Corridor::new(&path, 3);
        // (12, 13) is nearest to waypoint index 2
        assert_eq!(corridor.progress(Position::new(12, 13)), 0.5);
        assert_eq!(corridor.progress(Position::new(9, 12)), 0.0);
    }

    #[test]
    fn test_single_waypoint_progress_is_zero() {
        let path = vec![Position::new(4, 4)];
        let corridor = Corridor::new(&path, 3);
        assert_eq!(corridor.progress(Position::new(6, 6)), 0.0);
    }

    #[test]
    fn test_plasma_anchor_colours() {
        assert_eq!(plasma_color(0.0), Rgb(0, 0, 255));
        assert_eq!(plasma_color(0.25), Rgb(128, 0, 255));
        assert_eq!(plasma_color(0.5), Rgb(255, 0, 0));
        assert_eq!(plasma_color(0.75), Rgb(255, 165, 0));
        assert_eq!(plasma_color(1.0), Rgb(255, 255, 0));
    }

    #[test]
    fn test_plasma_continuous_at_breakpoints() {
        for breakpoint in [0.25_f32, 0.5, 0.75] {
            let below = plasma_color(breakpoint - 1e-4);
            let above = plasma_color(breakpoint);
            for (a, b) in [(below.0, above.0), (below.1, above.1), (below.2, above.2)] {
                assert!(a.abs_diff(b) <= 1, "jump at {breakpoint}: {below:?} -> {above:?}");
            }
        }
    }

    #[test]
    fn test_plasma_blue_fade_truncates_the_faded_amount() {
        // 255 - trunc(10.2), not trunc(244.8)
        assert_eq!(plasma_color(0.26).2, 245);
    }

    #[test]
    fn test_plasma_clamps_out_of_range() {
        assert_eq!(plasma_color(-1.0), Rgb(0, 0, 255));
        assert_eq!(plasma_color(2.0), Rgb(255, 255, 0));
    }
}
