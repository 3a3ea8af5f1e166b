//! `cr-agent`: agents and how they decide what to do.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`agent`]   | `Agent`, `Traits`; the per-round state machine (`Agent::act`)   |
//! | [`state`]   | `AgentState` (`Thinking`, `Moving`, `Stalking`, `Loitering`)    |
//! | [`action`]  | `Action` (`Wait`, `Move`, `Rob`)                                |
//! | [`context`] | `DecisionContext` (per-agent queries), `WorldView` (borrowed world) |
//! | [`roster`]  | `AgentRoster`: id-keyed agent storage                           |
//! | [`factory`] | `AgentFactory`: random traits, placement, context wiring        |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                                  |
//!
//! # Design notes
//!
//! One round for one agent:
//!
//! 1. The simulation loop takes the agent out of the roster and builds a
//!    `WorldView` over the grid, the remaining roster, the pathfinder and the
//!    shared RNG.
//! 2. `Agent::act` runs the state machine and returns one `Action`.
//! 3. The view is dropped, the agent is restored, and the loop applies the
//!    action to the grid.
//!
//! Cells refer to agents by `AgentId` only; the roster is the single owner.

pub mod action;
pub mod agent;
pub mod context;
pub mod error;
pub mod factory;
pub mod roster;
pub mod state;


pub use action::Action;
pub use agent::{Agent, Traits};
pub use context::{DecisionContext, WorldView};
pub use error::{AgentError, AgentResult};
pub use factory::AgentFactory;
pub use roster::{AgentRoster, retire};
pub use state::AgentState;
