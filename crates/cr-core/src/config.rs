//! Simulation configuration.
//!
//! Typically loaded from a TOML run-parameter file by `cr-io` (with the
//! `serde` feature) and passed to the simulation builder.  Every field has a
//! default, so a parameter file only needs to name what it changes.

use crate::{CoreError, CoreResult};

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Target population.  The roster is topped back up to this size at the
    /// end of every round.
    pub population: usize,

    /// Rounds to simulate in a batch run.
    pub rounds: u64,

    /// An agent that has acted more than this many rounds is removed.
    pub round_timeout: u32,

    /// Master RNG seed.  The same seed always produces identical results
    /// under the synchronous pathfinder.
    pub seed: u64,

    /// Compute random routes on a worker pool instead of inline.
    pub parallel: bool,

    /// Worker count for the pathfinding pool (only used when `parallel`).
    pub threads: usize,

    /// Dump the crime heat map every N rounds.  0 disables periodic dumps.
    pub dump_frequency: u64,

    /// Weights and thresholds consulted by the agents' decision context.
    pub decision: DecisionConfig,

    /// Lamp falloff used by the lighting pre-pass.
    pub lighting: LightingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population:     50,
            rounds:         10_000,
            round_timeout:  600,
            seed:           123_456_789,
            parallel:       false,
            threads:        4,
            dump_frequency: 10_000,
            decision:       DecisionConfig::default(),
            lighting:       LightingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Reject combinations that would divide by zero or build an empty pool.
    pub fn validate(&self) -> CoreResult<()> {
        if self.parallel && self.threads == 0 {
            return Err(CoreError::Config("parallel pathfinding needs at least one thread".into()));
        }
        self.decision.validate()?;
        self.lighting.validate()
    }
}

// ── DecisionConfig ────────────────────────────────────────────────────────────

/// Crime propensity weights, crime-condition weights and state timeouts.
///
/// Propensity = `(age·wₐ + education·wₑ + income·wᵢ + random·wᵣ) / Σw`.
/// Light threshold = `(crime_light_threshold·w_l + random·w_lr) / Σw`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecisionConfig {
    pub age_weight:             u32,
    pub education_weight:       u32,
    pub income_weight:          u32,
    pub would_rob_random_weight: u32,

    pub light_weight:           u32,
    pub light_random_weight:    u32,

    /// Agents only rob where the local light is below a blend of this value
    /// and a random draw.
    pub crime_light_threshold:  f64,

    /// Maximum visible non-stalking agents tolerated during a robbery.
    pub max_witnesses_in_sight: usize,

    pub timeouts: StateTimeouts,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            age_weight:              1,
            education_weight:        1,
            income_weight:           1,
            would_rob_random_weight: 1,
            light_weight:            1,
            light_random_weight:     1,
            crime_light_threshold:   LightingConfig::DEFAULT_THRESHOLD,
            max_witnesses_in_sight:  2,
            timeouts:                StateTimeouts::default(),
        }
    }
}

impl DecisionConfig {
    /// Denominator of the propensity blend.  `None` on overflow.
    #[inline]
    pub fn total_would_rob_weight(&self) -> Option<u32> {
        self.age_weight
            .checked_add(self.education_weight)?
            .checked_add(self.income_weight)?
            .checked_add(self.would_rob_random_weight)
    }

    /// Denominator of the light-threshold blend.  `None` on overflow.
    #[inline]
    pub fn total_conditions_weight(&self) -> Option<u32> {
        self.light_weight.checked_add(self.light_random_weight)
    }

    pub fn validate(&self) -> CoreResult<()> {
        match self.total_would_rob_weight() {
            None => return Err(CoreError::Config("crime propensity weights overflow".into())),
            Some(0) => return Err(CoreError::Config("crime propensity weights sum to zero".into())),
            Some(_) => {}
        }
        match self.total_conditions_weight() {
            None => return Err(CoreError::Config("light condition weights overflow".into())),
            Some(0) => return Err(CoreError::Config("light condition weights sum to zero".into())),
            Some(_) => {}
        }
        Ok(())
    }
}

/// Randomised per-state patience, in rounds.
///
/// Entering `MOVING`/`STALKING` draws a timeout from
/// `[base_timeout, base_timeout + max_timeout)`; entering `LOITERING` draws
/// from `[base_loiter, base_loiter + max_loiter)`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateTimeouts {
    pub base_timeout: u32,
    pub max_timeout:  u32,
    pub base_loiter:  u32,
    pub max_loiter:   u32,
}

impl Default for StateTimeouts {
    fn default() -> Self {
        Self { base_timeout: 5, max_timeout: 5, base_loiter: 10, max_loiter: 30 }
    }
}

// ── LightingConfig ────────────────────────────────────────────────────────────

/// Lamp falloff.
///
/// Light at distance `d` from a lamp is `(1 + d)^k` with
/// `k = ln(threshold) / ln(1 + radius)`, so it decays to exactly `threshold`
/// at `radius` and anything dimmer is clamped to 0.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightingConfig {
    pub radius:    f64,
    pub threshold: f64,
}

impl LightingConfig {
    pub const DEFAULT_RADIUS: f64 = 15.0;
    pub const DEFAULT_THRESHOLD: f64 = 0.1;

    /// Falloff exponent `k`.
    #[inline]
    pub fn exponent(&self) -> f64 {
        self.threshold.ln() / (1.0 + self.radius).ln()
    }

    /// Half-width of the square neighbourhood scanned around each lamp.
    #[inline]
    pub fn radius_cells(&self) -> i32 {
        self.radius.floor() as i32
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.radius > 0.0) {
            return Err(CoreError::Config(format!("lighting radius must be positive, got {}", self.radius)));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(CoreError::Config(format!(
                "lighting threshold must lie in (0, 1), got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self { radius: Self::DEFAULT_RADIUS, threshold: Self::DEFAULT_THRESHOLD }
    }
}
