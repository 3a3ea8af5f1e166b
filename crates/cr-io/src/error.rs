//! Error types for cr-io.

use cr_core::CoreError;
use cr_grid::GridError;
use thiserror::Error;

/// Errors that can occur when loading inputs or writing output.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parameter file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("map parse error: {0}")]
    Map(String),

    #[error("heat map parse error: {0}")]
    HeatMap(String),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("invalid parameters: {0}")]
    Core(#[from] CoreError),
}

/// Alias for `Result<T, IoError>`.
pub type IoResult<T> = Result<T, IoError>;
