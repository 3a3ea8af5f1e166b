//! `.map` grid files.
//!
//! # Format
//!
//! A stream of non-negative integers separated by any run of non-digit
//! characters:
//!
//! ```text
//! width height
//! k(0,0) k(1,0) … k(width-1,0)
//! k(0,1) …
//! ```
//!
//! followed by `width × height` cell-kind indices in row-major order (y outer,
//! x inner):
//!
//! | Index | Kind    |
//! |-------|---------|
//! | 0     | `Path`  |
//! | 1     | `House` |
//! | 2     | `Shop`  |
//! | 3     | `Tree`  |
//! | 4     | `Lamp`  |
//!
//! Line breaks are cosmetic.  Anything after the last cell is ignored.
//! Lighting is not stored; it is recomputed when a simulation is built.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cr_grid::{CellKind, Grid};
use tracing::info;

use crate::{IoError, IoResult};

/// Load a grid from a `.map` file.
pub fn load_map(path: &Path) -> IoResult<Grid> {
    let text = std::fs::read_to_string(path)?;
    let grid = parse_map(&text)?;
    info!(path = %path.display(), width = grid.width(), height = grid.height(), "map loaded");
    Ok(grid)
}

/// Like [`load_map`] but parses text already in memory.
pub fn parse_map(text: &str) -> IoResult<Grid> {
    let mut numbers = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|e| IoError::Map(format!("bad number {s:?}: {e}"))));

    let mut next = |what: &str| -> IoResult<usize> {
        numbers.next().unwrap_or_else(|| Err(IoError::Map(format!("unexpected end of input reading {what}"))))
    };

    let width = next("width")?;
    let height = next("height")?;
    let cells = width
        .checked_mul(height)
        .ok_or_else(|| IoError::Map(format!("dimensions {width}x{height} overflow")))?;

    let mut kinds = Vec::with_capacity(cells);
    for i in 0..cells {
        let index = next("cell kind")?;
        let kind = u8::try_from(index)
            .ok()
            .and_then(CellKind::from_index)
            .ok_or_else(|| IoError::Map(format!("unknown cell kind {index} at cell {i}")))?;
        kinds.push(kind);
    }

    Ok(Grid::new(width, height, kinds)?)
}

/// Write `grid` in `.map` format: dimensions on the first line, then one line
/// per row.
pub fn write_map<W: Write>(grid: &Grid, mut out: W) -> IoResult<()> {
    writeln!(out, "{} {}", grid.width(), grid.height())?;
    let width = grid.width() as usize;
    let cells: Vec<_> = grid.cells().collect();
    for row in cells.chunks(width) {
        let line: Vec<String> = row.iter().map(|c| c.kind().index().to_string()).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

/// Save `grid` to a `.map` file, replacing any existing file.
pub fn save_map(grid: &Grid, path: &Path) -> IoResult<()> {
    let file = File::create(path)?;
    write_map(grid, BufWriter::new(file))
}
