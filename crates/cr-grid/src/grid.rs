//! The dense cell grid and its spatial queries.
//!
//! # Data layout
//!
//! Cells are stored row-major in a single `Vec`: the cell at `(x, y)` lives
//! at index `y * width + x`.  Dimensions are fixed at construction.
//!
//! # Occupancy
//!
//! A cell's `occupant` is a non-owning [`AgentId`] handle; the roster owns
//! the agents.  The mutators on this type ([`place_occupant`],
//! [`move_occupant`], [`clear_occupant`]) are the only way to change
//! occupancy and they refuse to stack two agents on one cell.
//!
//! [`place_occupant`]: Grid::place_occupant
//! [`move_occupant`]: Grid::move_occupant
//! [`clear_occupant`]: Grid::clear_occupant

use std::sync::Arc;

use cr_core::{AgentId, Point, SimRng, distance};

use crate::{Cell, CellKind, GridError, GridResult, MovementMask};

/// Rejection-sampling attempts allowed per grid cell before
/// [`Grid::random_cell`] gives up.  At 64 draws per cell a predicate that
/// holds for a single cell is missed with probability about e⁻⁶⁴.
const SAMPLE_ATTEMPTS_PER_CELL: usize = 64;

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Fixed-size 2D array of [`Cell`]s.
pub struct Grid {
    width:  i32,
    height: i32,
    cells:  Vec<Cell>,
    mask:   Arc<MovementMask>,
}

impl Grid {
    /// Build a grid from row-major cell kinds.
    pub fn new(width: usize, height: usize, kinds: Vec<CellKind>) -> GridResult<Self> {
        if width == 0 || height == 0 || i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let expected = width * height;
        if kinds.len() != expected {
            return Err(GridError::DimensionMismatch { expected, got: kinds.len() });
        }

        let (w, h) = (width as i32, height as i32);
        let cells: Vec<Cell> = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Cell::new(kind, Point::new(i as i32 % w, i as i32 / w)))
            .collect();
        let blocked = cells.iter().map(|c| c.kind().obstructs_movement()).collect();

        Ok(Self {
            width:  w,
            height: h,
            cells,
            mask:   Arc::new(MovementMask::new(w, h, blocked)),
        })
    }

    /// Build a grid by asking `kind_at` for every position.
    pub fn from_fn(
        width:   usize,
        height:  usize,
        mut kind_at: impl FnMut(Point) -> CellKind,
    ) -> GridResult<Self> {
        let mut kinds = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                kinds.push(kind_at(Point::new(x as i32, y as i32)));
            }
        }
        Self::new(width, height, kinds)
    }

    /// An obstruction-free grid of `Path` cells.
    pub fn open(width: usize, height: usize) -> GridResult<Self> {
        Self::new(width, height, vec![CellKind::Path; width * height])
    }

    // ── Dimensions & raw access ───────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        self.within_bounds(p).then(|| (p.y * self.width + p.x) as usize)
    }

    /// The cell at `p`, or `None` out of bounds.
    #[inline]
    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, p: Point) -> Option<&mut Cell> {
        self.index(p).map(move |i| &mut self.cells[i])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Shared handle to the immutable movement-obstruction snapshot.
    pub fn movement_mask(&self) -> Arc<MovementMask> {
        Arc::clone(&self.mask)
    }

    // ── Point queries ─────────────────────────────────────────────────────

    #[inline]
    pub fn within_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// `true` if out of bounds or the cell's kind blocks movement.
    /// Occupancy is not considered.
    #[inline]
    pub fn is_movement_obstruction(&self, p: Point) -> bool {
        self.cell(p).is_none_or(|c| c.kind().obstructs_movement())
    }

    /// `true` if out of bounds or the cell's kind blocks view.
    #[inline]
    pub fn is_view_obstruction(&self, p: Point) -> bool {
        self.cell(p).is_none_or(|c| c.kind().obstructs_view())
    }

    /// `true` if an agent stands at `p`.  `false` out of bounds.
    #[inline]
    pub fn is_occupied(&self, p: Point) -> bool {
        self.cell(p).is_some_and(|c| c.occupant.is_some())
    }

    /// In bounds, not a movement obstruction, and unoccupied.
    #[inline]
    pub fn is_free(&self, p: Point) -> bool {
        self.cell(p)
            .is_some_and(|c| !c.kind().obstructs_movement() && c.occupant.is_none())
    }

    /// Light level at `p`; 0 out of bounds.
    #[inline]
    pub fn light(&self, p: Point) -> f64 {
        self.cell(p).map_or(0.0, Cell::light)
    }

    /// The agent standing at `p`, if any.
    #[inline]
    pub fn occupant(&self, p: Point) -> Option<AgentId> {
        self.cell(p).and_then(Cell::occupant)
    }

    // ── Line of sight ─────────────────────────────────────────────────────

    /// Walk the Bresenham line from `from` to `to`, calling `visit` on each
    /// cell starting with the source.  Stops as soon as `visit` returns
    /// `false`, or after the destination.  No-op if either endpoint is out
    /// of bounds.
    ///
    /// Full 8-octant variant: the major axis advances every step and the
    /// minor axis whenever the accumulated error crosses the major length.
    pub fn trace_line<'a>(&'a self, from: Point, to: Point, mut visit: impl FnMut(&'a Cell) -> bool) {
        if !self.within_bounds(from) || !self.within_bounds(to) {
            return;
        }

        let delta_x = to.x - from.x;
        let delta_y = to.y - from.y;

        // Diagonal step taken when the error term overflows.
        let (dx1, dy1) = (delta_x.signum(), delta_y.signum());
        // Straight step along the major axis otherwise.
        let (dx2, dy2) = if delta_x.abs() > delta_y.abs() {
            (delta_x.signum(), 0)
        } else {
            (0, delta_y.signum())
        };

        let longest  = delta_x.abs().max(delta_y.abs());
        let shortest = delta_x.abs().min(delta_y.abs());
        let mut numerator = longest >> 1;

        let (mut x, mut y) = (from.x, from.y);
        for _ in 0..=longest {
            let cell = &self.cells[(y * self.width + x) as usize];
            if !visit(cell) {
                return;
            }
            numerator += shortest;
            if numerator >= longest {
                numerator -= longest;
                x += dx1;
                y += dy1;
            } else {
                x += dx2;
                y += dy2;
            }
        }
    }

    /// Cells on the line of sight from `from` towards `to`, in order from the
    /// source outward.  Stops before the first cell farther than `range`, or
    /// after the first view-obstructing cell (which is included).
    pub fn look(&self, from: Point, to: Point, range: f64) -> Vec<&Cell> {
        let mut seen = Vec::new();
        self.trace_line(from, to, |cell| {
            if distance(cell.x() - from.x, cell.y() - from.y) > range {
                return false;
            }
            seen.push(cell);
            !cell.kind().obstructs_view()
        });
        seen
    }

    /// `true` iff `to` is within Euclidean `range` of `from` and the line of
    /// sight reaches it before being cut off by a view obstruction.
    pub fn is_visible(&self, from: Point, to: Point, range: f64) -> bool {
        if range < from.distance_to(to) {
            return false;
        }
        let mut reached = false;
        self.trace_line(from, to, |cell| {
            reached = cell.position() == to;
            !cell.kind().obstructs_view()
        });
        reached
    }

    // ── Sampling & proximity ──────────────────────────────────────────────

    /// Uniformly sample cells until `predicate` holds.
    ///
    /// # Errors
    ///
    /// [`GridError::NoSatisfyingCell`] after `64 × cell_count` rejected
    /// draws, so an unsatisfiable predicate fails instead of spinning.
    pub fn random_cell(
        &self,
        rng:           &mut SimRng,
        mut predicate: impl FnMut(&Cell) -> bool,
    ) -> GridResult<&Cell> {
        let attempts = self.cells.len().saturating_mul(SAMPLE_ATTEMPTS_PER_CELL);
        for _ in 0..attempts {
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            let cell = &self.cells[(y * self.width + x) as usize];
            if predicate(cell) {
                return Ok(cell);
            }
        }
        Err(GridError::NoSatisfyingCell { attempts })
    }

    /// Agents within Euclidean `range` of `center` that are visible from it
    /// and pass `filter`, nearest first.
    ///
    /// Walks a square spiral outward from `center` (right, down, left, up,
    /// the run length growing every second leg) until a ring wider than
    /// `2·⌊range⌋ + 1` would start.  The output is distance-ordered by
    /// construction.  `center` itself is never visited.  `filter` runs only
    /// for occupied, visible cells.
    pub fn agents_around(
        &self,
        center:     Point,
        range:      f64,
        mut filter: impl FnMut(AgentId) -> bool,
    ) -> Vec<AgentId> {
        let mut found = Vec::new();
        let radius = range.floor() as i32;
        let limit = 2 * radius + 1;

        let (mut x, mut y) = (center.x, center.y);
        let (mut dx, mut dy) = (1, 0);
        let mut run_length = 1;

        while dx == 1 || run_length < limit {
            for _ in 0..run_length {
                x += dx;
                y += dy;
                let p = Point::new(x, y);
                if let Some(agent) = self.occupant(p)
                    && self.is_visible(center, p, range)
                    && filter(agent)
                {
                    found.push(agent);
                }
            }

            // The run grows after every vertical leg.
            if dx == 0 {
                run_length += 1;
            }
            // Quarter turn.
            (dx, dy) = (-dy, dx);
        }

        found
    }

    // ── Mutation (simulation loop only) ───────────────────────────────────

    /// Put `agent` on the free cell `p`.
    pub fn place_occupant(&mut self, p: Point, agent: AgentId) -> GridResult<()> {
        if !self.within_bounds(p) {
            return Err(GridError::OutOfBounds(p));
        }
        if !self.is_free(p) {
            return Err(GridError::CellNotFree(p));
        }
        if let Some(cell) = self.cell_mut(p) {
            cell.occupant = Some(agent);
        }
        Ok(())
    }

    /// Clear `p`'s occupant slot, returning who was there.
    pub fn clear_occupant(&mut self, p: Point) -> Option<AgentId> {
        self.cell_mut(p).and_then(|c| c.occupant.take())
    }

    /// Move whoever stands on `from` to the free cell `to`.
    pub fn move_occupant(&mut self, from: Point, to: Point) -> GridResult<()> {
        if !self.is_free(to) {
            return Err(GridError::CellNotFree(to));
        }
        let agent = self.clear_occupant(from).ok_or(GridError::OutOfBounds(from))?;
        self.place_occupant(to, agent)
    }

    /// Change the kind of the cell at `p` and rebuild the movement mask.
    ///
    /// Light is left untouched; call [`Lighting::relight`](crate::Lighting::relight)
    /// afterwards.  Refuses to turn an occupied cell into an obstruction.
    pub fn set_kind(&mut self, p: Point, kind: CellKind) -> GridResult<()> {
        let cell = self.cell_mut(p).ok_or(GridError::OutOfBounds(p))?;
        if kind.obstructs_movement() && cell.occupant.is_some() {
            return Err(GridError::CellNotFree(p));
        }
        cell.kind = kind;

        let blocked = self.cells.iter().map(|c| c.kind().obstructs_movement()).collect();
        self.mask = Arc::new(MovementMask::new(self.width, self.height, blocked));
        Ok(())
    }

    #[inline]
    pub(crate) fn set_light(&mut self, p: Point, light: f64) {
        if let Some(cell) = self.cell_mut(p) {
            cell.light = light;
        }
    }

    /// Increment the crime count at `p`, returning the new count (0 out of
    /// bounds).
    pub fn record_crime(&mut self, p: Point) -> u32 {
        self.cell_mut(p).map_or(0, |c| {
            c.crime_count += 1;
            c.crime_count
        })
    }

    /// Highest crime count over all cells.  A full scan; the simulation keeps
    /// a running maximum instead.
    pub fn max_crime_count(&self) -> u32 {
        self.cells.iter().map(Cell::crime_count).max().unwrap_or(0)
    }
}
