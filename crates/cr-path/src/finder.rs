//! The pathfinding strategy interface.
//!
//! # Pluggability
//!
//! Agents ask for routes through the [`PathFinder`] trait, so the simulation
//! does not care whether searches run inline or on a worker pool.  The two
//! strategies shipped here are a closed set, wrapped in [`AnyPathFinder`] and
//! selected from [`SimConfig::parallel`].

use std::sync::Arc;

use cr_core::{Point, SimConfig};
use cr_grid::{Grid, MovementMask};

use crate::{ConcurrentPathFinder, PathResult, Route, SyncPathFinder, detour};

// ── PathPoll ──────────────────────────────────────────────────────────────────

/// Outcome of polling for a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathPoll {
    /// The search finished.  The route may be empty if no path exists.
    Ready(Route),
    /// The search is still running; poll again with the same endpoints.
    Pending,
}

impl PathPoll {
    pub fn is_pending(&self) -> bool {
        matches!(self, PathPoll::Pending)
    }

    pub fn ready(self) -> Option<Route> {
        match self {
            PathPoll::Ready(route) => Some(route),
            PathPoll::Pending      => None,
        }
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Route provider.
///
/// Searches treat only static movement obstructions as walls; agents are
/// ignored.  Detours are the exception: they avoid occupied cells and always
/// block the caller.
pub trait PathFinder: Send {
    /// Request a route from `from` to `to`.
    ///
    /// Strategies that search off-thread return [`PathPoll::Pending`] until
    /// the result is in; callers poll by repeating the call with identical
    /// endpoints.
    fn compute_path(&mut self, from: Point, to: Point) -> PathPoll;

    /// Withdraw an outstanding request the caller will not poll again.
    /// Its result, if any, is discarded.
    fn forget(&mut self, _from: Point, _to: Point) {}

    /// Splice a short detour around an obstruction into the front of
    /// `route`.  See [`detour::compute_detour`].
    fn compute_detour(&self, grid: &Grid, from: Point, limit: u32, route: &mut Route) -> bool {
        detour::compute_detour(grid, from, limit, route)
    }

    /// Release background resources.  Outstanding work is abandoned.
    fn shutdown(&mut self) {}
}

// ── AnyPathFinder ─────────────────────────────────────────────────────────────

/// The configured strategy.
pub enum AnyPathFinder {
    Synchronous(SyncPathFinder),
    Concurrent(ConcurrentPathFinder),
}

impl AnyPathFinder {
    /// Concurrent with `config.threads` workers if `config.parallel`,
    /// synchronous otherwise.
    pub fn from_config(config: &SimConfig, mask: Arc<MovementMask>) -> PathResult<Self> {
        Ok(if config.parallel {
            AnyPathFinder::Concurrent(ConcurrentPathFinder::new(mask, config.threads)?)
        } else {
            AnyPathFinder::Synchronous(SyncPathFinder::new(mask))
        })
    }

    pub fn is_concurrent(&self) -> bool {
        matches!(self, AnyPathFinder::Concurrent(_))
    }
}

impl PathFinder for AnyPathFinder {
    fn compute_path(&mut self, from: Point, to: Point) -> PathPoll {
        match self {
            AnyPathFinder::Synchronous(p) => p.compute_path(from, to),
            AnyPathFinder::Concurrent(p)  => p.compute_path(from, to),
        }
    }

    fn forget(&mut self, from: Point, to: Point) {
        match self {
            AnyPathFinder::Synchronous(p) => p.forget(from, to),
            AnyPathFinder::Concurrent(p)  => p.forget(from, to),
        }
    }

    fn shutdown(&mut self) {
        match self {
            AnyPathFinder::Synchronous(p) => p.shutdown(),
            AnyPathFinder::Concurrent(p)  => p.shutdown(),
        }
    }
}
