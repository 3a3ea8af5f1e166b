use thiserror::Error;

use cr_core::AgentId;
use cr_grid::GridError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("decision context already bound to {bound}, cannot rebind to {attempted}")]
    ContextAlreadyBound { bound: AgentId, attempted: AgentId },

    #[error("agent placement failed: {0}")]
    Grid(#[from] GridError),
}

pub type AgentResult<T> = Result<T, AgentError>;
