//! Lamp light propagation.
//!
//! A one-shot pre-pass run after the grid is built.  Each lamp lights the
//! `Path`/`Lamp` cells it can see within a square of half-width `⌊radius⌋`;
//! overlapping lamps combine by maximum, never by sum.

use cr_core::{LightingConfig, Point, distance};
use tracing::debug;

use crate::{CellKind, Grid};

/// Precomputed falloff parameters for one lighting configuration.
#[derive(Clone, Debug)]
pub struct Lighting {
    exponent:     f64,
    threshold:    f64,
    radius_cells: i32,
}

impl Lighting {
    pub fn new(config: &LightingConfig) -> Self {
        Self {
            exponent:     config.exponent(),
            threshold:    config.threshold,
            radius_cells: config.radius_cells(),
        }
    }

    /// Light contributed by a lamp at Euclidean distance `d`, clamped to 0
    /// below the threshold.
    #[inline]
    pub fn light_at_distance(&self, d: f64) -> f64 {
        let light = (1.0 + d).powf(self.exponent);
        if light < self.threshold { 0.0 } else { light }
    }

    /// Light every lamp on the grid.  Returns the number of lamps.
    pub fn apply(&self, grid: &mut Grid) -> usize {
        let lamps: Vec<Point> = grid
            .cells()
            .filter(|c| c.kind() == CellKind::Lamp)
            .map(|c| c.position())
            .collect();
        for &lamp in &lamps {
            self.apply_lamp(grid, lamp);
        }
        debug!(lamps = lamps.len(), "lighting computed");
        lamps.len()
    }

    /// Reset all light to 0 and recompute from scratch.  Used after
    /// [`Grid::set_kind`] edits.
    pub fn relight(&self, grid: &mut Grid) -> usize {
        let all: Vec<Point> = grid.cells().map(|c| c.position()).collect();
        for p in all {
            grid.set_light(p, 0.0);
        }
        self.apply(grid)
    }

    /// Spread one lamp's light over its neighbourhood.
    pub fn apply_lamp(&self, grid: &mut Grid, lamp: Point) {
        let r = self.radius_cells;
        for i in -r..=r {
            for j in -r..=r {
                let target = Point::new(lamp.x + i, lamp.y + j);
                let lit = grid
                    .cell(target)
                    .is_some_and(|c| c.kind().receives_light())
                    && has_line_of_sight(grid, lamp, target);
                if !lit {
                    continue;
                }
                let light = self.light_at_distance(distance(i, j));
                if light > grid.light(target) {
                    grid.set_light(target, light);
                }
            }
        }
    }
}

/// `true` if the traced line from `from` reaches `to` before any
/// view-blocking cell stops it.  Range is unlimited.
fn has_line_of_sight(grid: &Grid, from: Point, to: Point) -> bool {
    let mut reached = false;
    grid.trace_line(from, to, |cell| {
        reached = cell.position() == to;
        !cell.kind().obstructs_view()
    });
    reached
}
