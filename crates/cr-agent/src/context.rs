//! What an agent can see and ask for while deciding.
//!
//! Two pieces:
//!
//! - [`WorldView`]: borrowed simulation state handed to the acting agent
//!   for one call to [`Agent::act`](crate::Agent::act).  Built by the
//!   simulation loop and dropped before the resulting action is applied.
//! - [`DecisionContext`]: per-agent helper owned by the agent.  Answers
//!   questions from the agent's position and traits: who is in sight, would
//!   I rob them, is it dark enough, how do I get there.
//!
//! # Two-phase construction
//!
//! A context is created unbound and tied to its agent once with
//! [`bind`](DecisionContext::bind).  Binding twice is an error.

use std::sync::Arc;

use cr_core::{AgentId, DecisionConfig, Direction, Point, SimRng};
use cr_grid::{Cell, Grid};
use cr_path::{PathFinder, PathPoll, Route};
use tracing::{debug, trace, warn};

use crate::{Agent, AgentError, AgentResult, AgentRoster, AgentState, Traits};

// ── WorldView ─────────────────────────────────────────────────────────────────

/// Everything an agent may consult during its turn.
///
/// The acting agent itself has been taken out of `roster`; its occupant
/// slot on `grid` is still set.
pub struct WorldView<'a> {
    pub grid:       &'a Grid,
    pub roster:     &'a AgentRoster,
    pub pathfinder: &'a mut dyn PathFinder,
    pub rng:        &'a mut SimRng,
}

// ── DecisionContext ───────────────────────────────────────────────────────────

pub struct DecisionContext {
    config: Arc<DecisionConfig>,
    agent:  Option<AgentId>,
    /// Destination of the random route being waited on, if any.
    pub(crate) random_destination: Option<Point>,
    /// Endpoints of the last request the pathfinder answered with `Pending`.
    requested: Option<(Point, Point)>,
}

impl DecisionContext {
    /// An unbound context.
    pub fn new(config: Arc<DecisionConfig>) -> Self {
        Self { config, agent: None, random_destination: None, requested: None }
    }

    /// Tie this context to `agent`.
    ///
    /// # Errors
    ///
    /// [`AgentError::ContextAlreadyBound`] if already bound.
    pub fn bind(&mut self, agent: AgentId) -> AgentResult<()> {
        if let Some(bound) = self.agent {
            return Err(AgentError::ContextAlreadyBound { bound, attempted: agent });
        }
        self.agent = Some(agent);
        Ok(())
    }

    pub fn agent(&self) -> Option<AgentId> {
        self.agent
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    // ── Immediate surroundings ────────────────────────────────────────────

    /// Is the neighbouring cell in `dir` enterable?
    #[inline]
    pub fn is_free(&self, world: &WorldView<'_>, pos: Point, dir: Direction) -> bool {
        world.grid.is_free(pos.step(dir))
    }

    /// Who stands on the neighbouring cell in `dir`.
    #[inline]
    pub fn occupant(&self, world: &WorldView<'_>, pos: Point, dir: Direction) -> Option<AgentId> {
        world.grid.occupant(pos.step(dir))
    }

    /// Light where the agent stands.
    #[inline]
    pub fn light(&self, world: &WorldView<'_>, pos: Point) -> f64 {
        world.grid.light(pos)
    }

    /// Cells along the agent's line of sight towards `to`.
    pub fn look<'w>(&self, world: &WorldView<'w>, pos: Point, traits: &Traits, to: Point) -> Vec<&'w Cell> {
        world.grid.look(pos, to, traits.vision_range)
    }

    pub fn is_visible(&self, world: &WorldView<'_>, pos: Point, traits: &Traits, to: Point) -> bool {
        world.grid.is_visible(pos, to, traits.vision_range)
    }

    // ── Other agents ──────────────────────────────────────────────────────

    /// Every visible agent, nearest first.
    pub fn agents_in_sight(&self, world: &WorldView<'_>, pos: Point, traits: &Traits) -> Vec<AgentId> {
        world.grid.agents_around(pos, traits.vision_range, |_| true)
    }

    /// Visible agents that are not stalking anyone, nearest first.
    pub fn witnesses_in_sight(&self, world: &WorldView<'_>, pos: Point, traits: &Traits) -> Vec<AgentId> {
        let roster = world.roster;
        world.grid.agents_around(pos, traits.vision_range, |id| {
            roster.get(id).is_some_and(|a| a.state() != AgentState::Stalking)
        })
    }

    /// Would an agent with `traits` rob `victim`?
    ///
    /// Propensity is the weighted mean of age, education, income and a fresh
    /// uniform draw.  The agent robs if that falls below the victim's
    /// apparent wealth and the victim is not itself stalking.
    pub fn would_rob(&self, traits: &Traits, victim: &Agent, rng: &mut SimRng) -> bool {
        let c = &self.config;
        let propensity = (traits.age * f64::from(c.age_weight)
            + traits.education * f64::from(c.education_weight)
            + traits.income * f64::from(c.income_weight)
            + rng.unit() * f64::from(c.would_rob_random_weight))
            / f64::from(c.total_would_rob_weight().unwrap_or(u32::MAX));

        propensity < victim.traits().apparent_wealth && victim.state() != AgentState::Stalking
    }

    /// Visible agents this one would rob, nearest first.
    pub fn potential_victims(&self, world: &mut WorldView<'_>, pos: Point, traits: &Traits) -> Vec<AgentId> {
        let (grid, roster) = (world.grid, world.roster);
        let rng = &mut *world.rng;
        grid.agents_around(pos, traits.vision_range, |id| {
            roster.get(id).is_some_and(|victim| self.would_rob(traits, victim, rng))
        })
    }

    /// The wealthiest-looking potential victim.  On equal wealth the nearest
    /// wins.
    pub fn victim(&self, world: &mut WorldView<'_>, pos: Point, traits: &Traits) -> Option<AgentId> {
        let candidates = self.potential_victims(world, pos, traits);

        let mut best: Option<(AgentId, f64)> = None;
        for id in candidates {
            let Some(agent) = world.roster.get(id) else { continue };
            let wealth = agent.traits().apparent_wealth;
            if best.is_none_or(|(_, top)| wealth > top) {
                best = Some((id, wealth));
            }
        }

        let victim = best.map(|(id, _)| id);
        if let Some(victim) = victim {
            debug!(agent = ?self.agent, %victim, "victim found");
        }
        victim
    }

    /// Dark enough and few enough onlookers?
    ///
    /// The light where the agent stands must be below a weighted blend of
    /// the configured threshold and a uniform draw, and the number of
    /// visible non-stalking agents must not exceed the configured maximum.
    pub fn conditions_are_right(&self, world: &mut WorldView<'_>, pos: Point, traits: &Traits) -> bool {
        let c = &self.config;
        let threshold = (c.crime_light_threshold * f64::from(c.light_weight)
            + world.rng.unit() * f64::from(c.light_random_weight))
            / f64::from(c.total_conditions_weight().unwrap_or(u32::MAX));

        self.light(world, pos) < threshold
            && self.witnesses_in_sight(world, pos, traits).len() <= c.max_witnesses_in_sight
    }

    // ── Routes ────────────────────────────────────────────────────────────

    /// Poll for a route to `to`.  `None` while the pathfinder is still
    /// working, or if `to` can never be stood on.
    ///
    /// Asking for different endpoints withdraws the previous request.
    pub fn route(&mut self, world: &mut WorldView<'_>, from: Point, to: Point) -> Option<Route> {
        if self.requested.is_some_and(|r| r != (from, to)) {
            self.release(&mut *world.pathfinder);
        }
        if !world.grid.within_bounds(to) || world.grid.is_movement_obstruction(to) {
            return None;
        }
        match world.pathfinder.compute_path(from, to) {
            PathPoll::Ready(route) => {
                self.requested = None;
                Some(route)
            }
            PathPoll::Pending => {
                self.requested = Some((from, to));
                None
            }
        }
    }

    /// Withdraw the request still waiting on `pathfinder`, if any.
    pub fn release(&mut self, pathfinder: &mut dyn PathFinder) {
        if let Some((from, to)) = self.requested.take() {
            pathfinder.forget(from, to);
        }
    }

    /// Endpoints of the request still waiting on the pathfinder.
    pub fn pending_request(&self) -> Option<(Point, Point)> {
        self.requested
    }

    /// Poll for a route to a random enterable cell.
    ///
    /// The destination is drawn on the first call and kept until its route
    /// arrives, so repeated polls hit the same pathfinding job.
    pub fn random_route(&mut self, world: &mut WorldView<'_>, from: Point) -> Option<Route> {
        let destination = match self.random_destination {
            Some(destination) => destination,
            None => {
                let drawn = world
                    .grid
                    .random_cell(world.rng, |c| !c.kind().obstructs_movement())
                    .map(Cell::position);
                match drawn {
                    Ok(destination) => {
                        trace!(agent = ?self.agent, %destination, "new random destination");
                        self.random_destination = Some(destination);
                        destination
                    }
                    Err(err) => {
                        warn!(agent = ?self.agent, %err, "no random destination available");
                        return None;
                    }
                }
            }
        };

        let route = self.route(world, from, destination);
        if route.is_some() {
            self.random_destination = None;
        }
        route
    }

    /// Poll for a route onto `target`'s cell.
    pub fn route_to_agent(&mut self, world: &mut WorldView<'_>, from: Point, target: AgentId) -> Option<Route> {
        let to = world.roster.get(target)?.position();
        self.route(world, from, to)
    }

    /// Try to replan around whatever blocks the front of `route`, looking no
    /// farther than the agent's vision range.
    pub fn dodge_obstruction(
        &self,
        world:  &mut WorldView<'_>,
        pos:    Point,
        traits: &Traits,
        route:  &mut Route,
    ) -> bool {
        let limit = traits.vision_range.floor() as u32;
        world.pathfinder.compute_detour(world.grid, pos, limit, route)
    }
}
