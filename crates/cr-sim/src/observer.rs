//! Simulation observer trait for progress reporting and data collection.

use cr_core::{AgentId, Point, Round};
use cr_grid::Grid;

/// One robbery, reported as it is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CrimeEvent {
    pub round:  Round,
    pub robber: AgentId,
    pub victim: AgentId,
    /// The victim's cell, whose crime count was incremented.
    pub position: Point,
    /// Crime count of `position` after this robbery.
    pub count: u32,
}

/// Bookkeeping for one completed round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundSummary {
    /// The round that just ran.
    pub round: Round,
    /// Agents that produced an action.
    pub acted: usize,
    pub crimes: usize,
    /// Robbers, victims and timed-out agents taken off the grid.
    pub removed: usize,
    /// Fresh agents created to restore the population.
    pub spawned: usize,
    /// Roster size after replenishment.
    pub population: usize,
    /// Running maximum crime count over all cells.
    pub max_crime: u32,
}

/// Callbacks invoked by [`Simulation`][crate::Simulation] at key points in
/// the round loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: crime printer
///
/// ```rust,ignore
/// struct CrimePrinter;
///
/// impl SimObserver for CrimePrinter {
///     fn on_crime(&mut self, event: &CrimeEvent) {
///         println!("{}: {} robbed {} at {}", event.round, event.robber, event.victim, event.position);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each round, before any agent acts.
    fn on_round_start(&mut self, _round: Round) {}

    /// Called once per robbery, after the crime count is recorded and before
    /// the two agents are removed.
    fn on_crime(&mut self, _event: &CrimeEvent) {}

    /// Called after removal and replenishment.
    ///
    /// Provides read-only access to the grid so that output writers can
    /// record crime counts without the simulation knowing about any file
    /// format.
    fn on_round_end(&mut self, _summary: &RoundSummary, _grid: &Grid) {}

    /// Called once after the final round of [`run`](crate::Simulation::run).
    /// `rounds` is the number of rounds completed.
    fn on_sim_end(&mut self, _rounds: Round, _grid: &Grid) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
