//! Agent actions: what an agent asks the simulation loop to do each round.

use cr_core::Direction;

/// One agent's request for the current round.
///
/// Produced by [`Agent::act`][crate::Agent::act] and applied by the
/// simulation loop, which re-checks it against the grid: a `Move` into a
/// cell that filled up in the meantime is dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Stay put.
    Wait,

    /// Step one cell in `Direction`.  The step has already been consumed
    /// from the agent's route.
    Move(Direction),

    /// Rob whoever stands one cell away in `Direction`.
    Rob(Direction),
}

impl Action {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Wait                      => None,
            Action::Move(d) | Action::Rob(d) => Some(d),
        }
    }
}
