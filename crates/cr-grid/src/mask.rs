//! Immutable movement-obstruction snapshot.

use cr_core::Point;

/// Which cells block movement, frozen when taken.
///
/// Shared through an `Arc` with pathfinding workers.  Editing a cell kind
/// swaps in a fresh mask; holders of the old one keep seeing the old layout.  Workers read
/// nothing else from the grid; occupancy and crime counts stay on the
/// simulation thread.
#[derive(Clone, Debug)]
pub struct MovementMask {
    width:   i32,
    height:  i32,
    blocked: Vec<bool>,
}

impl MovementMask {
    pub(crate) fn new(width: i32, height: i32, blocked: Vec<bool>) -> Self {
        Self { width, height, blocked }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn within_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// `true` for out-of-bounds points and movement-obstructing cells.
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        !self.within_bounds(p) || self.blocked[(p.y * self.width + p.x) as usize]
    }
}
