//! CSV crime heat maps.
//!
//! One file per dump, `heatmap_<rounds>.csv`, holding `height` rows of
//! `width` crime counts and no header.

use std::path::{Path, PathBuf};

use cr_core::Round;
use cr_grid::Grid;
use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use crate::{IoError, IoResult};

/// Writes crime-count matrices into one directory.
pub struct HeatMapWriter {
    dir:     PathBuf,
    written: Vec<PathBuf>,
}

impl HeatMapWriter {
    /// Create `dir` if needed.
    pub fn new(dir: &Path) -> IoResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), written: Vec::new() })
    }

    /// Path of the dump taken after `rounds` rounds.
    pub fn path_for(&self, rounds: Round) -> PathBuf {
        self.dir.join(format!("heatmap_{}.csv", rounds.0))
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Dump the grid's crime counts as they stand after `rounds` rounds.
    pub fn write(&mut self, grid: &Grid, rounds: Round) -> IoResult<PathBuf> {
        let path = self.path_for(rounds);
        let mut out = WriterBuilder::new().has_headers(false).from_path(&path)?;

        let width = grid.width() as usize;
        let counts: Vec<String> = grid.cells().map(|c| c.crime_count().to_string()).collect();
        for row in counts.chunks(width) {
            out.write_record(row)?;
        }
        out.flush()?;

        debug!(path = %path.display(), %rounds, "heat map written");
        self.written.push(path.clone());
        Ok(path)
    }
}

/// A crime-count matrix read back from a dump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatMap {
    pub width:  usize,
    pub height: usize,
    /// Row-major counts.
    pub counts: Vec<u32>,
}

impl HeatMap {
    pub fn load(path: &Path) -> IoResult<Self> {
        let mut reader = ReaderBuilder::new().has_headers(false).from_path(path)?;

        let mut width = None;
        let mut counts = Vec::new();
        let mut height = 0;
        for record in reader.records() {
            let record = record?;
            let row_width = *width.get_or_insert(record.len());
            if record.len() != row_width {
                return Err(IoError::HeatMap(format!(
                    "row {height} has {} columns, expected {row_width}",
                    record.len()
                )));
            }
            for field in &record {
                let count = field
                    .trim()
                    .parse()
                    .map_err(|e| IoError::HeatMap(format!("bad count {field:?} in row {height}: {e}")))?;
                counts.push(count);
            }
            height += 1;
        }

        Ok(Self { width: width.unwrap_or(0), height, counts })
    }

    /// Count at `(x, y)`, 0 outside the matrix.
    pub fn get(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.counts[y * self.width + x]
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `true` if the matrix matches `grid`'s dimensions.
    pub fn fits(&self, grid: &Grid) -> bool {
        self.width == grid.width() as usize && self.height == grid.height() as usize
    }
}
