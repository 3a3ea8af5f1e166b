//! The agent and its per-round state machine.

use cr_core::{AgentId, Direction, Point, SimRng};
use cr_grid::Grid;
use cr_path::{PathFinder, Route};
use tracing::debug;

use crate::{Action, AgentState, DecisionContext, WorldView};

// ── Traits ────────────────────────────────────────────────────────────────────

/// Fixed characteristics drawn at creation.
///
/// `age`, `education`, `income` and `apparent_wealth` are normalised to
/// `[0, 1]`.  `vision_range` is in cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Traits {
    pub age:             f64,
    pub education:       f64,
    pub income:          f64,
    pub apparent_wealth: f64,
    pub vision_range:    f64,
}

impl Traits {
    pub const MIN_VISION: f64 = 4.0;
    pub const VISION_SPREAD: f64 = 4.0;

    /// Uniform traits; vision in `[4, 8)`.  Draw order is fixed: age,
    /// education, income, apparent wealth, vision.
    pub fn random(rng: &mut SimRng) -> Self {
        Self {
            age:             rng.unit(),
            education:       rng.unit(),
            income:          rng.unit(),
            apparent_wealth: rng.unit(),
            vision_range:    rng.unit() * Self::VISION_SPREAD + Self::MIN_VISION,
        }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// A pedestrian who may turn robber.
///
/// Position is mirrored by the occupant slot of the grid cell it stands on;
/// [`step`](Self::step) and [`AgentRoster`](crate::AgentRoster) keep the two
/// in sync.
pub struct Agent {
    pub(crate) id:       AgentId,
    pub(crate) pos:      Point,
    pub(crate) traits:   Traits,
    pub(crate) state:    AgentState,
    pub(crate) route:    Option<Route>,
    pub(crate) target:   Option<AgentId>,
    /// Rounds left before the current state times out.  Counts down on
    /// every `Wait`, may go negative.
    pub(crate) wait:     i32,
    /// Value `wait` is reset to whenever the agent does something.
    pub(crate) max_wait: i32,
    /// Rounds acted so far.
    pub(crate) rounds:   u32,
    pub(crate) active:   bool,
    pub(crate) context:  DecisionContext,
}

impl Agent {
    pub(crate) fn new(id: AgentId, pos: Point, traits: Traits, context: DecisionContext) -> Self {
        Self {
            id,
            pos,
            traits,
            state: AgentState::Thinking,
            route: None,
            target: None,
            wait: 0,
            max_wait: 0,
            rounds: 0,
            active: true,
            context,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// The agent being stalked, if any.
    pub fn target(&self) -> Option<AgentId> {
        self.target
    }

    pub fn wait(&self) -> i32 {
        self.wait
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// `false` once removed from the roster.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn context(&self) -> &DecisionContext {
        &self.context
    }

    // ── Turn ──────────────────────────────────────────────────────────────

    /// Decide this round's action.
    ///
    /// State transitions happen in here.  Afterwards the wait timer counts
    /// down if the action is `Wait` and resets otherwise, and the round
    /// counter advances.
    pub fn act(&mut self, world: &mut WorldView<'_>) -> Action {
        let action = match self.state {
            AgentState::Thinking  => self.think(world),
            AgentState::Moving    => self.walk(world),
            AgentState::Stalking  => self.stalk(world),
            AgentState::Loitering => self.loiter(world),
        };

        if action == Action::Wait {
            self.wait -= 1;
        } else {
            self.wait = self.max_wait;
        }
        self.rounds += 1;

        action
    }

    /// Withdraw any route request this agent is still waiting on.  Called
    /// when the agent leaves the simulation.
    pub fn release_path(&mut self, pathfinder: &mut dyn PathFinder) {
        self.context.release(pathfinder);
    }

    /// Move one cell in `dir` if that cell is free, updating the grid.
    pub fn step(&mut self, grid: &mut Grid, dir: Direction) -> bool {
        let to = self.pos.step(dir);
        if grid.move_occupant(self.pos, to).is_err() {
            return false;
        }
        self.pos = to;
        true
    }

    /// Wait for a route to a random destination.
    fn think(&mut self, world: &mut WorldView<'_>) -> Action {
        self.route = self.context.random_route(world, self.pos);
        if self.route.is_some() {
            self.set_state(AgentState::Moving, world.rng);
        }
        Action::Wait
    }

    /// Follow the route unless someone worth robbing shows up.
    fn walk(&mut self, world: &mut WorldView<'_>) -> Action {
        self.target = self.context.victim(world, self.pos, &self.traits);
        if let Some(target) = self.target {
            self.route = self.context.route_to_agent(world, self.pos, target);
            self.set_state(AgentState::Stalking, world.rng);
            return Action::Wait;
        }

        let Some(route) = self.route.as_mut().filter(|r| !r.is_empty()) else {
            self.set_state(AgentState::Loitering, world.rng);
            return Action::Wait;
        };
        let Some(next) = route.next_step() else { return Action::Wait };

        if self.context.is_free(world, self.pos, next) {
            route.pop_step();
            return Action::Move(next);
        }

        let mut timed_out = false;
        if world.rng.coin() {
            if self.context.dodge_obstruction(world, self.pos, &self.traits, route) {
                if let Some(step) = route.pop_step() {
                    debug!(agent = %self.id, "dodging obstruction");
                    return Action::Move(step);
                }
            }
        } else if self.wait <= 0 {
            timed_out = true;
        }

        if timed_out {
            self.set_state(AgentState::Thinking, world.rng);
        }
        Action::Wait
    }

    /// Close in on the target and rob it when the moment is right.
    fn stalk(&mut self, world: &mut WorldView<'_>) -> Action {
        let target = self.target.filter(|&id| {
            world.roster.get(id).is_some_and(|t| t.state() != AgentState::Stalking)
        });
        let Some(target) = target else {
            self.context.release(&mut *world.pathfinder);
            self.set_state(AgentState::Loitering, world.rng);
            return Action::Wait;
        };

        if self.route.as_ref().is_none_or(Route::is_empty) {
            self.route = self.context.route_to_agent(world, self.pos, target);
            return Action::Wait;
        }
        let Some(route) = self.route.as_mut() else { return Action::Wait };
        let Some(next) = route.next_step() else { return Action::Wait };

        if self.context.is_free(world, self.pos, next) {
            route.pop_step();
            return Action::Move(next);
        }

        if self.context.occupant(world, self.pos, next) == Some(target)
            && self.context.conditions_are_right(world, self.pos, &self.traits)
        {
            return Action::Rob(next);
        }

        let mut timed_out = false;
        if world.rng.coin() {
            if self.context.dodge_obstruction(world, self.pos, &self.traits, route) {
                if let Some(step) = route.pop_step() {
                    return Action::Move(step);
                }
            }
        } else if self.wait <= 0 {
            timed_out = true;
        }

        if timed_out {
            self.set_state(AgentState::Loitering, world.rng);
        }
        Action::Wait
    }

    /// Idle, watching for victims, until the loiter time runs out.
    fn loiter(&mut self, world: &mut WorldView<'_>) -> Action {
        self.target = self.context.victim(world, self.pos, &self.traits);
        if let Some(target) = self.target {
            self.route = self.context.route_to_agent(world, self.pos, target);
            self.set_state(AgentState::Stalking, world.rng);
        } else if self.wait <= 0 {
            self.set_state(AgentState::Thinking, world.rng);
        }
        Action::Wait
    }

    /// Enter `state` and draw its timeout.
    ///
    /// | Entering               | `max_wait`                                    |
    /// |------------------------|-----------------------------------------------|
    /// | `Loitering`            | `base_loiter + [0, max_loiter)`               |
    /// | `Moving` / `Stalking`  | `base_timeout + [0, max_timeout)`             |
    /// | `Thinking`             | 0                                             |
    pub(crate) fn set_state(&mut self, state: AgentState, rng: &mut SimRng) {
        debug!(agent = %self.id, from = %self.state, to = %state, "state change");
        self.state = state;

        let t = &self.context.config().timeouts;
        self.max_wait = match state {
            AgentState::Loitering                       => rng.jitter(t.base_loiter, t.max_loiter),
            AgentState::Moving | AgentState::Stalking   => rng.jitter(t.base_timeout, t.max_timeout),
            AgentState::Thinking                        => 0,
        } as i32;
        self.wait = self.max_wait;
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("pos", &self.pos)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("wait", &self.wait)
            .field("rounds", &self.rounds)
            .finish()
    }
}
