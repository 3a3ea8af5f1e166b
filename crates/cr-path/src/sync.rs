//! Inline pathfinding.

use std::sync::Arc;

use cr_core::Point;
use cr_grid::MovementMask;

use crate::{PathFinder, PathPoll, astar};

/// Runs every search on the calling thread.  Never returns
/// [`PathPoll::Pending`].
pub struct SyncPathFinder {
    mask: Arc<MovementMask>,
}

impl SyncPathFinder {
    pub fn new(mask: Arc<MovementMask>) -> Self {
        Self { mask }
    }
}

impl PathFinder for SyncPathFinder {
    fn compute_path(&mut self, from: Point, to: Point) -> PathPoll {
        PathPoll::Ready(astar::search_mask(&self.mask, from, to, 0))
    }
}
