//! Integer grid geometry: points, cardinal directions, distances.
//!
//! Coordinates are `i32` so neighbour arithmetic can step outside the grid
//! without wrapping; every grid query treats out-of-range points as a safe
//! default instead of failing.  The y axis grows downwards, so `Up` is
//! `y - 1`.

use std::fmt;

// ── Point ─────────────────────────────────────────────────────────────────────

/// A cell coordinate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring point one step in `direction`.
    #[inline]
    pub fn step(self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance, the A* step cost and heuristic.
    #[inline]
    pub fn manhattan(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Euclidean distance, used for vision and light falloff.
    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        distance(other.x - self.x, other.y - self.y)
    }

    /// Direction of a unit cardinal step from `self` to `to`, if they are
    /// 4-adjacent.
    pub fn direction_to(self, to: Point) -> Option<Direction> {
        match (to.x - self.x, to.y - self.y) {
            (1, 0)  => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1)  => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Length of the hypotenuse of the triangle with legs `dx` and `dy`.
#[inline]
pub fn distance(dx: i32, dy: i32) -> f64 {
    f64::from(dx).hypot(f64::from(dy))
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One unit cardinal move.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour expansion order used by the search.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// `(dx, dy)` for one step.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (0, -1),
            Direction::Down  => (0, 1),
            Direction::Left  => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up    => Direction::Down,
            Direction::Down  => Direction::Up,
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up    => "up",
            Direction::Down  => "down",
            Direction::Left  => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
