//! Pathfinding on a fixed-size worker pool.
//!
//! # Job table
//!
//! Each outstanding search is keyed by its literal `(from, to)` endpoints and
//! owns the receiving half of a one-shot channel.  The table lives on the
//! simulation thread and is only touched by polling, so it needs no lock;
//! the channel is the sole hand-off between a worker and the table.
//!
//! | Poll sees                  | Outcome                                    |
//! |----------------------------|--------------------------------------------|
//! | no entry                   | submit a job, `Pending`                    |
//! | entry, nothing sent yet    | `Pending`                                  |
//! | entry, route sent          | remove entry, `Ready(route)`               |
//! | entry, sender dropped      | job died: log, resubmit, `Pending`         |
//!
//! A consumed result is not cached: polling the same endpoints again starts
//! a fresh search.  A caller that moves on to other endpoints withdraws its
//! old request with [`forget`](PathFinder::forget), so the table holds at
//! most one entry per caller.
//!
//! # Shutdown
//!
//! [`shutdown`](PathFinder::shutdown) raises a cancellation flag, drops the
//! pool handle and forgets every pending job without waiting.  Queued jobs
//! see the flag and exit without searching; a search already running
//! finishes into a channel nobody reads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use cr_core::Point;
use cr_grid::MovementMask;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rustc_hash::FxHashMap;
use tracing::{error, info, trace, warn};

use crate::{PathError, PathFinder, PathPoll, PathResult, Route, astar};

type SearchFn = dyn Fn(&MovementMask, Point, Point) -> Route + Send + Sync;

/// Endpoints of one search job.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
struct JobKey {
    from: Point,
    to:   Point,
}

/// Searches on `threads` background workers; polled from the simulation
/// thread.
pub struct ConcurrentPathFinder {
    mask:      Arc<MovementMask>,
    search:    Arc<SearchFn>,
    pool:      Option<ThreadPool>,
    pending:   FxHashMap<JobKey, Receiver<Route>>,
    cancelled: Arc<AtomicBool>,
}

impl ConcurrentPathFinder {
    pub fn new(mask: Arc<MovementMask>, threads: usize) -> PathResult<Self> {
        let search = |mask: &MovementMask, from: Point, to: Point| astar::search_mask(mask, from, to, 0);
        Self::with_search(mask, threads, Arc::new(search))
    }

    pub(crate) fn with_search(
        mask:    Arc<MovementMask>,
        threads: usize,
        search:  Arc<SearchFn>,
    ) -> PathResult<Self> {
        if threads == 0 {
            return Err(PathError::NoThreads);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pathfinder-{i}"))
            .panic_handler(|_| error!("pathfinding job panicked"))
            .build()?;
        info!(threads, "pathfinding worker pool started");

        Ok(Self {
            mask,
            search,
            pool: Some(pool),
            pending: FxHashMap::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Number of searches submitted and not yet collected.
    pub fn pending_jobs(&self) -> usize {
        self.pending.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.pool.is_none()
    }

    fn submit(&mut self, key: JobKey) {
        let Some(pool) = &self.pool else { return };

        let (tx, rx) = mpsc::channel();
        let mask = Arc::clone(&self.mask);
        let search = Arc::clone(&self.search);
        let cancelled = Arc::clone(&self.cancelled);
        pool.spawn(move || {
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            let route = search(&mask, key.from, key.to);
            // The table may have been dropped by shutdown.
            let _ = tx.send(route);
        });

        self.pending.insert(key, rx);
        trace!(from = %key.from, to = %key.to, pending = self.pending.len(), "path job submitted");
    }
}

impl PathFinder for ConcurrentPathFinder {
    fn compute_path(&mut self, from: Point, to: Point) -> PathPoll {
        let key = JobKey { from, to };
        let Some(rx) = self.pending.get(&key) else {
            self.submit(key);
            return PathPoll::Pending;
        };

        match rx.try_recv() {
            Ok(route) => {
                self.pending.remove(&key);
                PathPoll::Ready(route)
            }
            Err(TryRecvError::Empty) => PathPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                warn!(%from, %to, "path job failed, resubmitting");
                self.pending.remove(&key);
                self.submit(key);
                PathPoll::Pending
            }
        }
    }

    fn forget(&mut self, from: Point, to: Point) {
        if self.pending.remove(&JobKey { from, to }).is_some() {
            trace!(%from, %to, pending = self.pending.len(), "path job withdrawn");
        }
    }

    fn shutdown(&mut self) {
        if self.pool.is_none() {
            return;
        }
        self.cancelled.store(true, Ordering::Release);
        let abandoned = self.pending.len();
        self.pending.clear();
        self.pool = None;
        info!(abandoned, "pathfinding worker pool shut down");
    }
}

impl Drop for ConcurrentPathFinder {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
