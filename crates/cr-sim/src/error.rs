use cr_agent::AgentError;
use cr_core::CoreError;
use cr_grid::GridError;
use cr_path::PathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("population {population} does not fit on {free_cells} enterable cells")]
    Overpopulated {
        population: usize,
        free_cells: usize,
    },

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("pathfinder error: {0}")]
    Path(#[from] PathError),
}

pub type SimResult<T> = Result<T, SimError>;
