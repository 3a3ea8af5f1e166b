//! Routes: ordered unit steps from a start cell to a destination.

use std::collections::VecDeque;

use cr_core::{Direction, Point};

/// Ordered list of cardinal steps.  Consumed from the front as the agent
/// walks it.  An empty route means "nowhere to go": either the agent has
/// arrived or no path exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    steps: VecDeque<Direction>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step that would be taken next, without consuming it.
    #[inline]
    pub fn next_step(&self) -> Option<Direction> {
        self.steps.front().copied()
    }

    /// Consume the next step.
    #[inline]
    pub fn pop_step(&mut self) -> Option<Direction> {
        self.steps.pop_front()
    }

    pub fn steps(&self) -> impl Iterator<Item = Direction> + '_ {
        self.steps.iter().copied()
    }

    /// Cells visited when walking the route from `start`, excluding `start`.
    pub fn points(&self, start: Point) -> impl Iterator<Item = Point> + '_ {
        self.steps.iter().scan(start, |p, &d| {
            *p = p.step(d);
            Some(*p)
        })
    }

    /// Where the route ends when walked from `start`.
    pub fn destination(&self, start: Point) -> Point {
        self.points(start).last().unwrap_or(start)
    }

    /// Replace the first `count` steps with `prefix`.
    pub fn replace_prefix(&mut self, count: usize, prefix: Route) {
        self.steps.drain(..count.min(self.steps.len()));
        for d in prefix.steps.into_iter().rev() {
            self.steps.push_front(d);
        }
    }
}

impl FromIterator<Direction> for Route {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        Self { steps: iter.into_iter().collect() }
    }
}

impl From<Vec<Direction>> for Route {
    fn from(steps: Vec<Direction>) -> Self {
        Self { steps: steps.into() }
    }
}
