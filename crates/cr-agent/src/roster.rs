//! Agent storage keyed by `AgentId`.
//!
//! # Taking an agent out
//!
//! The acting agent needs `&mut self` while reading everyone else through a
//! shared [`WorldView`](crate::WorldView).  The simulation loop therefore
//! [`take`](AgentRoster::take)s it out for its turn and
//! [`restore`](AgentRoster::restore)s it afterwards.  Grid occupancy is not
//! touched by either.

use cr_core::AgentId;
use cr_grid::Grid;
use rustc_hash::FxHashMap;

use crate::Agent;

pub struct AgentRoster {
    agents:  FxHashMap<AgentId, Agent>,
    next_id: AgentId,
}

impl AgentRoster {
    pub fn new() -> Self {
        Self { agents: FxHashMap::default(), next_id: AgentId(0) }
    }

    /// Reserve a fresh id.  Ids are never reused.
    pub fn allocate_id(&mut self) -> AgentId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    pub(crate) fn insert(&mut self, agent: Agent) {
        self.agents.insert(agent.id(), agent);
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    /// Lift an agent out for its turn.
    pub fn take(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    /// Put back an agent lifted out with [`take`](Self::take).
    pub fn restore(&mut self, agent: Agent) {
        self.insert(agent);
    }

    /// Remove an agent from the simulation: deactivate it and clear its
    /// cell.
    pub fn remove(&mut self, id: AgentId, grid: &mut Grid) -> Option<Agent> {
        let mut agent = self.agents.remove(&id)?;
        retire(&mut agent, grid);
        Some(agent)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// All agents, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self::new()
    }
}

/// Deactivate an agent that is no longer in the roster and clear its cell.
pub fn retire(agent: &mut Agent, grid: &mut Grid) {
    agent.active = false;
    if grid.occupant(agent.pos) == Some(agent.id) {
        grid.clear_occupant(agent.pos);
    }
}
