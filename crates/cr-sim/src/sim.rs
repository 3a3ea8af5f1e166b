//! The `Simulation` struct and its round loop.

use std::collections::VecDeque;

use cr_agent::{Action, Agent, AgentFactory, AgentRoster, Traits, WorldView, retire};
use cr_core::{AgentId, Point, Round, SimConfig, SimRng};
use cr_grid::Grid;
use cr_path::{AnyPathFinder, PathFinder};
use tracing::{debug, info, trace};

use crate::{CrimeEvent, NoopObserver, RoundSummary, SimObserver, SimResult};

/// The main simulation runner.
///
/// `Simulation<P>` owns the grid, the roster, the pathfinder and the single
/// random generator, and drives the round loop:
///
/// 1. **Act**: each agent in turn order is taken out of the roster, asked
///    for its action against a [`WorldView`], and the action is applied
///    immediately, so later agents see earlier moves.
/// 2. **Apply**:
///    - `Move(d)`  → step if the target cell is still free, else nothing.
///    - `Rob(d)`   → if someone stands there, increment *their* cell's crime
///                   count and remove both robber and victim.
///    - `Wait`     → nothing.
/// 3. **Retire** agents that have acted more than `round_timeout` rounds.
/// 4. **Reorder**: every survivor goes to the front or back of next round's
///    order on a coin flip.
/// 5. **Replenish** the roster to `population`, new agents at the front.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<P: PathFinder = AnyPathFinder> {
    pub(crate) config:       SimConfig,
    pub(crate) grid:         Grid,
    pub(crate) roster:       AgentRoster,
    /// Turn order for the next round.  May name agents robbed earlier in the
    /// round being run; those are skipped.
    pub(crate) order:        VecDeque<AgentId>,
    pub(crate) factory:      AgentFactory,
    pub(crate) pathfinder:   P,
    pub(crate) rng:          SimRng,
    pub(crate) round:        Round,
    pub(crate) max_crime:    u32,
    pub(crate) total_crimes: u64,
}

impl<P: PathFinder> Simulation<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run `config.rounds` rounds from the current position, then call
    /// [`SimObserver::on_sim_end`].
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.run_rounds(self.config.rounds, observer)?;
        observer.on_sim_end(self.round, &self.grid);
        info!(
            rounds = self.round.0,
            crimes = self.total_crimes,
            max_crime = self.max_crime,
            "simulation finished"
        );
        Ok(())
    }

    /// Run exactly `n` rounds without the end-of-run hook.
    ///
    /// Useful for tests and UI-driven stepping.
    pub fn run_rounds<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.run_round_with(observer)?;
        }
        Ok(())
    }

    /// Advance the simulation by one round.
    pub fn run_round(&mut self) -> SimResult<RoundSummary> {
        self.run_round_with(&mut NoopObserver)
    }

    /// Advance the simulation by one round, reporting to `observer`.
    ///
    /// # Errors
    ///
    /// Only replenishment can fail, when no free cell turns up for a new
    /// agent.  Pathfinding and decision problems never abort a round.
    pub fn run_round_with<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RoundSummary> {
        let round = self.round;
        observer.on_round_start(round);
        trace!(%round, agents = self.roster.len(), "round start");

        let mut summary = RoundSummary { round, ..RoundSummary::default() };
        let order = std::mem::take(&mut self.order);
        let mut next = VecDeque::with_capacity(order.len());

        for id in order {
            // Robbed earlier this round.
            let Some(mut agent) = self.roster.take(id) else { continue };

            let action = {
                let mut view = WorldView {
                    grid:       &self.grid,
                    roster:     &self.roster,
                    pathfinder: &mut self.pathfinder,
                    rng:        &mut self.rng,
                };
                agent.act(&mut view)
            };
            summary.acted += 1;

            if let Some(victim) = self.apply(&mut agent, action, round, observer) {
                if let Some(mut victim) = self.roster.remove(victim, &mut self.grid) {
                    victim.release_path(&mut self.pathfinder);
                }
                agent.release_path(&mut self.pathfinder);
                retire(&mut agent, &mut self.grid);
                summary.crimes += 1;
                summary.removed += 2;
            } else if agent.rounds() > self.config.round_timeout {
                debug!(agent = %id, rounds = agent.rounds(), "round timeout");
                agent.release_path(&mut self.pathfinder);
                retire(&mut agent, &mut self.grid);
                summary.removed += 1;
            } else {
                self.roster.restore(agent);
                if self.rng.coin() {
                    next.push_front(id);
                } else {
                    next.push_back(id);
                }
            }
        }

        while self.roster.len() < self.config.population {
            let id = self.factory.create(&mut self.roster, &mut self.grid, &mut self.rng)?;
            next.push_front(id);
            summary.spawned += 1;
        }
        if summary.spawned > 0 {
            debug!(%round, spawned = summary.spawned, "population replenished");
        }

        self.order = next;
        self.round = round.next();

        summary.population = self.roster.len();
        summary.max_crime = self.max_crime;
        observer.on_round_end(&summary, &self.grid);
        trace!(%round, crimes = summary.crimes, removed = summary.removed, "round done");
        Ok(summary)
    }

    /// Place an agent with the given traits on the free cell `at`.  It acts
    /// first next round.
    pub fn spawn_agent_at(&mut self, traits: Traits, at: Point) -> SimResult<AgentId> {
        let id = self.factory.create_at(&mut self.roster, &mut self.grid, traits, at)?;
        self.order.push_front(id);
        Ok(id)
    }

    /// Release the pathfinder's background resources.  Idempotent.
    pub fn shutdown(&mut self) {
        self.pathfinder.shutdown();
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &AgentRoster {
        &self.roster
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.roster.get(id)
    }

    /// Turn order of the next round.
    pub fn turn_order(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.order.iter().copied().filter(|&id| self.roster.contains(id))
    }

    pub fn pathfinder(&self) -> &P {
        &self.pathfinder
    }

    /// Rounds completed so far.
    pub fn round(&self) -> Round {
        self.round
    }

    pub fn population(&self) -> usize {
        self.roster.len()
    }

    /// Highest crime count of any cell, kept up to date as crimes happen.
    pub fn max_crime(&self) -> u32 {
        self.max_crime
    }

    pub fn total_crimes(&self) -> u64 {
        self.total_crimes
    }

    // ── Action application ────────────────────────────────────────────────

    /// Commit `action` to the grid.  Returns the victim of a robbery.
    fn apply<O: SimObserver>(
        &mut self,
        agent:    &mut Agent,
        action:   Action,
        round:    Round,
        observer: &mut O,
    ) -> Option<AgentId> {
        match action {
            Action::Wait => None,

            // The target may have filled up since the agent decided.
            Action::Move(dir) => {
                if agent.step(&mut self.grid, dir) {
                    trace!(agent = %agent.id(), %dir, "moved");
                }
                None
            }

            Action::Rob(dir) => {
                let position = agent.position().step(dir);
                let victim = self.grid.occupant(position)?;

                let count = self.grid.record_crime(position);
                self.max_crime = self.max_crime.max(count);
                self.total_crimes += 1;
                info!(%round, robber = %agent.id(), %victim, %position, "robbery");

                observer.on_crime(&CrimeEvent { round, robber: agent.id(), victim, position, count });
                Some(victim)
            }
        }
    }
}
