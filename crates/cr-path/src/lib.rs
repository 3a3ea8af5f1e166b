//! `cr-path`: grid search and the pathfinding strategies agents poll.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`route`]      | `Route`: ordered cardinal steps                           |
//! | [`astar`]      | `search`, `search_mask`: bounded 4-connected A*           |
//! | [`finder`]     | `PathFinder` trait, `PathPoll`, `AnyPathFinder`           |
//! | [`sync`]       | `SyncPathFinder`: inline search                           |
//! | [`concurrent`] | `ConcurrentPathFinder`: rayon worker pool + job table     |
//! | [`detour`]     | `compute_detour`: blocking short-range replanning         |
//! | [`error`]      | `PathError`, `PathResult<T>`                              |
//!
//! # Threading
//!
//! Workers only ever see an `Arc<MovementMask>`, a frozen copy of which
//! cells block movement.  Occupancy, light and crime counts stay on the
//! simulation thread, so jobs share no mutable state.

pub mod astar;
pub mod concurrent;
pub mod detour;
pub mod error;
pub mod finder;
pub mod route;
pub mod sync;


pub use concurrent::ConcurrentPathFinder;
pub use error::{PathError, PathResult};
pub use finder::{AnyPathFinder, PathFinder, PathPoll};
pub use route::Route;
pub use sync::SyncPathFinder;
