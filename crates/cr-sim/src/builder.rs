//! Fluent builder for constructing a [`Simulation`].

use std::collections::VecDeque;
use std::sync::Arc;

use cr_agent::{AgentFactory, AgentRoster};
use cr_core::{Round, SimConfig, SimRng};
use cr_grid::{Grid, Lighting, MovementMask};
use cr_path::{AnyPathFinder, PathFinder};
use tracing::info;

use crate::{SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: population, seed, weights, pathfinding strategy, …
/// - [`Grid`]: the city, typically from `cr_io::load_map`
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                       |
/// |---------------------|-----------------------------------------------|
/// | `.prelit()`         | Lighting pre-pass runs during `build`         |
///
/// # Build order
///
/// 1. Validate the configuration and check the population fits.
/// 2. Run the lighting pre-pass.
/// 3. Seed the simulation RNG.
/// 4. Create the pathfinder.
/// 5. Populate the grid.
///
/// # Example
///
/// ```rust,ignore
/// let grid = cr_io::load_map("city.map")?;
/// let mut sim = SimBuilder::new(config, grid).build()?;
/// sim.run(&mut NoopObserver)?;
/// sim.shutdown();
/// ```
pub struct SimBuilder {
    config: SimConfig,
    grid:   Grid,
    lit:    bool,
}

impl SimBuilder {
    pub fn new(config: SimConfig, grid: Grid) -> Self {
        Self { config, grid, lit: false }
    }

    /// The grid already carries its lighting; skip the pre-pass.
    pub fn prelit(mut self) -> Self {
        self.lit = true;
        self
    }

    /// Build with the strategy named by `config.parallel`.
    pub fn build(self) -> SimResult<Simulation<AnyPathFinder>> {
        let config = self.config.clone();
        self.build_with(|mask| AnyPathFinder::from_config(&config, mask).map_err(SimError::from))
    }

    /// Build with a caller-supplied pathfinder, created from the grid's
    /// movement mask.
    pub fn build_with<P, F>(self, make_pathfinder: F) -> SimResult<Simulation<P>>
    where
        P: PathFinder,
        F: FnOnce(Arc<MovementMask>) -> SimResult<P>,
    {
        let Self { config, mut grid, lit } = self;
        config.validate()?;

        let free_cells = grid
            .cells()
            .filter(|c| !c.kind().obstructs_movement() && c.occupant().is_none())
            .count();
        if config.population > free_cells {
            return Err(SimError::Overpopulated { population: config.population, free_cells });
        }

        info!(width = grid.width(), height = grid.height(), "initialising simulation");
        if !lit {
            Lighting::new(&config.lighting).apply(&mut grid);
        }

        let mut rng = SimRng::new(config.seed);
        let pathfinder = make_pathfinder(grid.movement_mask())?;

        let factory = AgentFactory::new(Arc::new(config.decision.clone()));
        let mut roster = AgentRoster::new();
        let order: VecDeque<_> = factory
            .populate(config.population, &mut roster, &mut grid, &mut rng)?
            .into();

        Ok(Simulation {
            config,
            grid,
            roster,
            order,
            factory,
            pathfinder,
            rng,
            round: Round::ZERO,
            max_crime: 0,
            total_crimes: 0,
        })
    }
}
