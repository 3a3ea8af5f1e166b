//! Simulation time model.
//!
//! Time advances in whole rounds.  Every active agent produces exactly one
//! action per round, so a `Round` is both the clock and the unit of agent age.

use std::fmt;

/// An absolute round counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round(pub u64);

impl Round {
    pub const ZERO: Round = Round(0);

    /// The round after `self`.
    #[inline]
    pub fn next(self) -> Round {
        Round(self.0 + 1)
    }

    /// `true` when `self` falls on a multiple of `every` (never for 0).
    #[inline]
    pub fn is_multiple_of(self, every: u64) -> bool {
        every > 0 && self.0 % every == 0
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}
