//! Cell types and per-cell state.

use cr_core::{AgentId, Point};

// ── CellKind ──────────────────────────────────────────────────────────────────

/// The closed set of terrain types a cell can have.
///
/// | Kind    | Blocks movement | Blocks view | Index |
/// |---------|-----------------|-------------|-------|
/// | `Path`  | no              | no          | 0     |
/// | `House` | yes             | yes         | 1     |
/// | `Shop`  | yes             | yes         | 2     |
/// | `Tree`  | yes             | no          | 3     |
/// | `Lamp`  | no              | no          | 4     |
///
/// The index is the numeric code used by the `.map` file format.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Path,
    House,
    Shop,
    Tree,
    Lamp,
}

impl CellKind {
    /// All kinds in map-index order.
    pub const ALL: [CellKind; 5] = [
        CellKind::Path,
        CellKind::House,
        CellKind::Shop,
        CellKind::Tree,
        CellKind::Lamp,
    ];

    #[inline]
    pub const fn obstructs_movement(self) -> bool {
        matches!(self, CellKind::House | CellKind::Shop | CellKind::Tree)
    }

    #[inline]
    pub const fn obstructs_view(self) -> bool {
        matches!(self, CellKind::House | CellKind::Shop)
    }

    /// Cells that lamps can illuminate.
    #[inline]
    pub const fn receives_light(self) -> bool {
        matches!(self, CellKind::Path | CellKind::Lamp)
    }

    /// Display colour for renderers.
    pub const fn colour(self) -> &'static str {
        match self {
            CellKind::Path  => "#333333",
            CellKind::House => "#9999ff",
            CellKind::Shop  => "#99ffff",
            CellKind::Tree  => "#99ff99",
            CellKind::Lamp  => "#ffff99",
        }
    }

    /// Map-file code for this kind.
    pub const fn index(self) -> u8 {
        match self {
            CellKind::Path  => 0,
            CellKind::House => 1,
            CellKind::Shop  => 2,
            CellKind::Tree  => 3,
            CellKind::Lamp  => 4,
        }
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: u8) -> Option<CellKind> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Path  => "path",
            CellKind::House => "house",
            CellKind::Shop  => "shop",
            CellKind::Tree  => "tree",
            CellKind::Lamp  => "lamp",
        }
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One grid cell.
///
/// Position is fixed at construction; kind changes only through
/// [`Grid::set_kind`](crate::Grid::set_kind).  `light` is written by
/// [`Lighting`](crate::Lighting) only; `occupant` and `crime_count` are written by the
/// simulation loop through [`Grid`](crate::Grid)'s mutators, which keep the
/// one-agent-per-cell invariant.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub(crate) kind:        CellKind,
    pos:                    Point,
    pub(crate) light:       f64,
    pub(crate) occupant:    Option<AgentId>,
    pub(crate) crime_count: u32,
}

impl Cell {
    pub(crate) fn new(kind: CellKind, pos: Point) -> Self {
        Self { kind, pos, light: 0.0, occupant: None, crime_count: 0 }
    }

    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    /// Light level in `[0, 1]`.
    #[inline]
    pub fn light(&self) -> f64 {
        self.light
    }

    /// The agent standing here, if any.  A non-owning handle; resolve it
    /// through the roster.
    #[inline]
    pub fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    /// Robberies recorded on this cell.  Never decreases within a run.
    #[inline]
    pub fn crime_count(&self) -> u32 {
        self.crime_count
    }
}
