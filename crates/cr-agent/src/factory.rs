//! Agent creation: draw traits, find a free cell, wire up the context.

use std::sync::Arc;

use cr_core::{AgentId, DecisionConfig, Point, SimRng};
use cr_grid::Grid;
use tracing::{info, trace};

use crate::{Agent, AgentResult, AgentRoster, DecisionContext, Traits};

/// Builds agents that share one decision configuration.
pub struct AgentFactory {
    config: Arc<DecisionConfig>,
}

impl AgentFactory {
    pub fn new(config: Arc<DecisionConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<DecisionConfig> {
        &self.config
    }

    /// Create one agent with random traits on a uniformly chosen free cell.
    ///
    /// # Errors
    ///
    /// Fails with the grid's `NoSatisfyingCell` if no free cell turns up.
    pub fn create(&self, roster: &mut AgentRoster, grid: &mut Grid, rng: &mut SimRng) -> AgentResult<AgentId> {
        let traits = Traits::random(rng);
        let pos = grid
            .random_cell(rng, |c| !c.kind().obstructs_movement() && c.occupant().is_none())?
            .position();
        self.create_at(roster, grid, traits, pos)
    }

    /// Create one agent with the given traits on the free cell `pos`.
    pub fn create_at(
        &self,
        roster: &mut AgentRoster,
        grid:   &mut Grid,
        traits: Traits,
        pos:    Point,
    ) -> AgentResult<AgentId> {
        let id = roster.allocate_id();
        grid.place_occupant(pos, id)?;

        let mut context = DecisionContext::new(Arc::clone(&self.config));
        context.bind(id)?;
        roster.insert(Agent::new(id, pos, traits, context));

        trace!(agent = %id, %pos, "agent created");
        Ok(id)
    }

    /// Create `count` agents.  Returns their ids in creation order.
    pub fn populate(
        &self,
        count:  usize,
        roster: &mut AgentRoster,
        grid:   &mut Grid,
        rng:    &mut SimRng,
    ) -> AgentResult<Vec<AgentId>> {
        info!(count, "creating agents");
        (0..count).map(|_| self.create(roster, grid, rng)).collect()
    }
}
