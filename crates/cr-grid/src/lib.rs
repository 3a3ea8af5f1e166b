//! `cr-grid`: the city grid and its spatial-query primitives.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`cell`]     | `CellKind` (closed set of cell types), `Cell`                |
//! | [`grid`]     | `Grid`: obstruction, visibility, line tracing, proximity     |
//! | [`mask`]     | `MovementMask`: immutable obstruction snapshot for workers   |
//! | [`lighting`] | `Lighting`: one-shot lamp propagation pre-pass               |
//! | [`error`]    | `GridError`, `GridResult<T>`                                 |
//!
//! # Out-of-bounds policy
//!
//! Every coordinate-taking query answers out-of-range input with a safe
//! default (`false`, `0.0`, empty) instead of failing.  Obstruction queries
//! answer `true` so searches never leave the grid.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `CellKind`.             |

pub mod cell;
pub mod error;
pub mod grid;
pub mod lighting;
pub mod mask;

#[cfg(test)]
mod tests;

pub use cell::{Cell, CellKind};
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use lighting::Lighting;
pub use mask::MovementMask;
