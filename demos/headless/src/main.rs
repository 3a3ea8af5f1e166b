//! headless: batch runner for the grid-city crime simulation.
//!
//! Loads a TOML parameter file and the map it names, runs `rounds` rounds
//! with no display, and dumps the crime heat map as CSV every
//! `dump_frequency` rounds and once at the end.
//!
//! ```text
//! headless data/params.toml --out output/run1
//! RUST_LOG=cr_sim=debug headless data/params.toml --rounds 200
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cr_core::Round;
use cr_grid::Grid;
use cr_io::{HeatMapObserver, HeatMapWriter, load_map, load_params};
use cr_sim::{CrimeEvent, RoundSummary, SimBuilder, SimObserver};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Run the grid-city crime simulation without a display")]
struct Args {
    /// TOML run-parameter file.
    params: PathBuf,

    /// Map file, overriding the one in the parameter file.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Heat-map output directory, overriding the parameter file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of rounds, overriding the parameter file.
    #[arg(long)]
    rounds: Option<u64>,

    /// RNG seed, overriding the parameter file.
    #[arg(long)]
    seed: Option<u64>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Tallies the run and forwards to the heat-map observer when dumps are on.
struct RunObserver {
    heat:    Option<HeatMapObserver>,
    crimes:  usize,
    removed: usize,
    spawned: usize,
}

impl RunObserver {
    fn new(heat: Option<HeatMapObserver>) -> Self {
        Self { heat, crimes: 0, removed: 0, spawned: 0 }
    }
}

impl SimObserver for RunObserver {
    fn on_crime(&mut self, _event: &CrimeEvent) {
        self.crimes += 1;
    }

    fn on_round_end(&mut self, summary: &RoundSummary, grid: &Grid) {
        self.removed += summary.removed;
        self.spawned += summary.spawned;
        if let Some(heat) = &mut self.heat {
            heat.on_round_end(summary, grid);
        }
    }

    fn on_sim_end(&mut self, rounds: Round, grid: &Grid) {
        if let Some(heat) = &mut self.heat {
            heat.on_sim_end(rounds, grid);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // 1. Parameters, with command-line overrides.
    let mut params = load_params(&args.params)
        .with_context(|| format!("loading parameters from {}", args.params.display()))?;
    if let Some(map) = args.map {
        params.map = map;
    }
    if let Some(out) = args.out {
        params.heat_map_dir = Some(out);
    }
    if let Some(rounds) = args.rounds {
        params.sim.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        params.sim.seed = seed;
    }

    // 2. Map.
    let grid = load_map(&params.map).with_context(|| format!("loading map {}", params.map.display()))?;

    // 3. Simulation.
    let mut sim = SimBuilder::new(params.sim.clone(), grid).build()?;
    info!(
        population = sim.population(),
        parallel = sim.pathfinder().is_concurrent(),
        rounds = params.sim.rounds,
        "simulation ready"
    );

    // 4. Output.
    let heat = match &params.heat_map_dir {
        Some(dir) => Some(HeatMapObserver::new(HeatMapWriter::new(dir)?, params.sim.dump_frequency)),
        None => None,
    };
    let mut obs = RunObserver::new(heat);

    // 5. Run.  The pathfinder is shut down even if the run fails.
    let t0 = Instant::now();
    let result = sim.run(&mut obs);
    sim.shutdown();
    result?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.heat.as_mut().and_then(HeatMapObserver::take_error) {
        error!(%e, "heat-map output failed");
    }

    // 6. Summary.
    info!(
        rounds = sim.round().0,
        crimes = obs.crimes,
        removed = obs.removed,
        spawned = obs.spawned,
        max_crime = sim.max_crime(),
        secs = elapsed.as_secs_f64(),
        "run complete"
    );
    Ok(())
}
