//! `cr-core`: foundational types for the grid-city crime simulation.
//!
//! This crate is a dependency of every other `cr-*` crate.  It intentionally
//! has no `cr-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`geometry`]    | `Point`, `Direction`, Euclidean distance              |
//! | [`time`]        | `Round` counter                                       |
//! | [`rng`]         | `SimRng` (the single simulation-wide generator)       |
//! | [`config`]      | `SimConfig`, `DecisionConfig`, `LightingConfig`       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `cr-io` to load run-parameter files.           |

pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DecisionConfig, LightingConfig, SimConfig, StateTimeouts};
pub use error::{CoreError, CoreResult};
pub use geometry::{Direction, Point, distance};
pub use ids::AgentId;
pub use rng::SimRng;
pub use time::Round;
