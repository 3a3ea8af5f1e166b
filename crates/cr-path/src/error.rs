//! Pathfinding error type.
//!
//! Search exhaustion is not an error: it yields an empty [`Route`](crate::Route).
//! Only setting up the worker pool can fail.

use thiserror::Error;

/// Errors produced by `cr-path`.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("failed to start pathfinding worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("pathfinding worker pool needs at least one thread")]
    NoThreads,
}

pub type PathResult<T> = Result<T, PathError>;
