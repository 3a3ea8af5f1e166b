//! Grid error type.

use thiserror::Error;

use cr_core::Point;

/// Errors produced by `cr-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("no cell satisfied the sampling predicate after {attempts} attempts")]
    NoSatisfyingCell { attempts: usize },

    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("expected {expected} cells for the grid dimensions, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("cell {0} is out of bounds")]
    OutOfBounds(Point),

    #[error("cell {0} is obstructed or already occupied")]
    CellNotFree(Point),
}

pub type GridResult<T> = Result<T, GridError>;
