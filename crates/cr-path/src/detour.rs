//! Short-range replanning around occupied cells.

use cr_core::Point;
use cr_grid::Grid;
use tracing::debug;

use crate::{Route, astar};

/// Replan the start of `route` around whatever blocks it.
///
/// Walks the route from `from` until it reaches a free cell, giving up after
/// `limit` cells.  Then searches from `from` to that cell treating occupied
/// cells as obstacles, with the same `limit` on path cost.  On success the
/// walked prefix is replaced by the detour and `true` is returned; otherwise
/// `route` is left untouched.
///
/// Always runs on the calling thread.  A zero `limit` never detours.
pub fn compute_detour(grid: &Grid, from: Point, limit: u32, route: &mut Route) -> bool {
    if limit == 0 {
        return false;
    }

    let mut skipped = 0usize;
    let mut rejoin = None;
    for p in route.points(from) {
        skipped += 1;
        if grid.is_free(p) {
            rejoin = Some(p);
            break;
        }
        if skipped >= limit as usize {
            break;
        }
    }

    let Some(rejoin) = rejoin else {
        return false;
    };

    let detour = astar::search(grid.width(), grid.height(), from, rejoin, limit, |p| !grid.is_free(p));
    if detour.is_empty() {
        return false;
    }

    debug!(%from, %rejoin, skipped, detour = detour.len(), "detour found");
    route.replace_prefix(skipped, detour);
    true
}
