//! `cr-sim`: round loop orchestrator for the grid-city crime simulation.
//!
//! # Round loop
//!
//! ```text
//! for id in turn order:
//!   1. Act        take the agent out of the roster, call Agent::act with a
//!                 WorldView over the grid, roster, pathfinder and RNG.
//!   2. Apply      Move → step if still free
//!                 Rob  → crime count of the victim's cell += 1,
//!                        remove robber and victim
//!                 Wait → nothing
//!   3. Timeout    remove the agent if it has acted > round_timeout rounds.
//!   4. Reorder    survivors to the front or back of next round, coin flip.
//! 5. Replenish    create agents until the roster is back to `population`,
//!                 each at the front of next round's order.
//! ```
//!
//! Under the synchronous pathfinder a run is fully determined by the
//! configuration and the grid.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cr_core::SimConfig;
//! use cr_sim::{NoopObserver, SimBuilder};
//!
//! let grid = cr_io::load_map("city.map")?;
//! let mut sim = SimBuilder::new(SimConfig::default(), grid).build()?;
//! sim.run(&mut NoopObserver)?;
//! sim.shutdown();
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{CrimeEvent, NoopObserver, RoundSummary, SimObserver};
pub use sim::Simulation;
