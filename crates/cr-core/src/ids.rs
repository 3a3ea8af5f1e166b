//! Strongly typed agent identifier.
//!
//! Agent ids are handed out monotonically by the roster and never reused, so
//! a stale id held by a cell or a stalker simply stops resolving once its
//! agent has been removed.  Ids are `Copy + Ord + Hash` so they work as map
//! keys and in sorted collections without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The id following `self`, used by monotonic allocators.
            #[inline(always)]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identity of one agent for the lifetime of a run.  Max ~4.3 billion
    /// agents may ever be created, including replenished ones.
    pub struct AgentId(u32);
}
