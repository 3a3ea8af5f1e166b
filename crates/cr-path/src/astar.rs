//! A* search over 4-connected grid cells.
//!
//! Step cost and heuristic are both Manhattan distance, so the heuristic is
//! consistent and the first time the destination is popped its route is
//! shortest.  Neighbours are expanded in [`Direction::ALL`] order (right,
//! left, down, up); equal-`f` entries pop in insertion order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use cr_core::{Direction, Point};
use cr_grid::MovementMask;

use crate::Route;

/// Search from `from` to `to` on a `width × height` grid, never entering a
/// cell for which `blocked` returns `true`.  `blocked` is not consulted for
/// `from`.
///
/// With `limit > 0`, a cell is only queued if its path cost from `from` is
/// below `limit`; `0` means unlimited.
///
/// Returns an empty route when no path exists within the limit, when either
/// endpoint is out of bounds, or when `from == to`.
pub fn search(
    width:   i32,
    height:  i32,
    from:    Point,
    to:      Point,
    limit:   u32,
    blocked: impl Fn(Point) -> bool,
) -> Route {
    let in_bounds = |p: Point| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height;
    if from == to || !in_bounds(from) || !in_bounds(to) {
        return Route::new();
    }

    let index = |p: Point| (p.y * width + p.x) as usize;
    let n = (width * height) as usize;

    // cost[i] = best known steps from `from` to cell i.
    let mut cost   = vec![u32::MAX; n];
    // via[i] = step taken into cell i on its best known path.
    let mut via    = vec![None::<Direction>; n];
    let mut closed = vec![false; n];

    // Min-heap on (f, insertion seq); the seq keeps tie-breaking stable.
    let mut open: BinaryHeap<Reverse<(u32, u32, i32, i32)>> = BinaryHeap::new();
    let mut seq = 0u32;

    cost[index(from)] = 0;
    open.push(Reverse((from.manhattan(to), seq, from.x, from.y)));

    while let Some(Reverse((_, _, x, y))) = open.pop() {
        let current = Point::new(x, y);
        let ci = index(current);
        if closed[ci] {
            continue;
        }
        closed[ci] = true;

        if current == to {
            return reconstruct(&via, from, to, index);
        }

        for dir in Direction::ALL {
            let next = current.step(dir);
            if !in_bounds(next) || blocked(next) {
                continue;
            }
            let ni = index(next);
            if closed[ni] {
                continue;
            }
            let tentative = cost[ci] + 1;
            if limit != 0 && tentative >= limit {
                continue;
            }
            if tentative < cost[ni] {
                cost[ni] = tentative;
                via[ni] = Some(dir);
                seq += 1;
                open.push(Reverse((tentative + next.manhattan(to), seq, next.x, next.y)));
            }
        }
    }

    Route::new()
}

/// Search on a movement mask: only static obstructions block, agents do not.
pub fn search_mask(mask: &MovementMask, from: Point, to: Point, limit: u32) -> Route {
    search(mask.width(), mask.height(), from, to, limit, |p| mask.is_blocked(p))
}

fn reconstruct(
    via:   &[Option<Direction>],
    from:  Point,
    to:    Point,
    index: impl Fn(Point) -> usize,
) -> Route {
    let mut steps = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some(dir) = via[index(cur)] else { break };
        steps.push(dir);
        cur = cur.step(dir.opposite());
    }
    steps.reverse();
    Route::from(steps)
}
