//! TOML run-parameter files.
//!
//! ```toml
//! map = "city.map"
//! heat_map_dir = "out"
//!
//! population = 50
//! rounds = 10000
//! round_timeout = 600
//! seed = 123456789
//! parallel = false
//! threads = 4
//! dump_frequency = 10000
//!
//! [decision]
//! age_weight = 1
//! crime_light_threshold = 0.1
//! max_witnesses_in_sight = 2
//!
//! [decision.timeouts]
//! base_loiter = 10
//!
//! [lighting]
//! radius = 15.0
//! ```
//!
//! Only `map` is required; every simulation key falls back to
//! [`SimConfig::default`].  Relative paths are resolved against the
//! directory holding the parameter file.

use std::path::{Path, PathBuf};

use cr_core::SimConfig;
use serde::Deserialize;
use tracing::info;

use crate::IoResult;

/// Everything needed to start a headless run.
#[derive(Clone, Debug, Deserialize)]
pub struct RunParameters {
    /// The `.map` file to load.
    pub map: PathBuf,

    /// Where heat-map CSVs go.  `None` disables dumps.
    #[serde(default)]
    pub heat_map_dir: Option<PathBuf>,

    #[serde(flatten)]
    pub sim: SimConfig,
}

impl RunParameters {
    /// Parse parameters from TOML text.  Paths are left as written.
    pub fn from_toml(text: &str) -> IoResult<Self> {
        let params: RunParameters = toml::from_str(text)?;
        params.sim.validate()?;
        Ok(params)
    }

    /// Make relative paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.map.is_relative() {
            self.map = base.join(&self.map);
        }
        if let Some(dir) = self.heat_map_dir.as_mut().filter(|d| d.is_relative()) {
            *dir = base.join(&*dir);
        }
    }
}

/// Load and validate a parameter file.
pub fn load_params(path: &Path) -> IoResult<RunParameters> {
    let text = std::fs::read_to_string(path)?;
    let mut params = RunParameters::from_toml(&text)?;
    if let Some(base) = path.parent() {
        params.resolve_paths(base);
    }

    let s = &params.sim;
    info!(
        path = %path.display(),
        map = %params.map.display(),
        population = s.population,
        rounds = s.rounds,
        seed = s.seed,
        parallel = s.parallel,
        threads = s.threads,
        round_timeout = s.round_timeout,
        dump_frequency = s.dump_frequency,
        "parameters loaded"
    );
    Ok(params)
}
