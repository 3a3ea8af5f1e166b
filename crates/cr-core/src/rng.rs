//! The simulation-wide deterministic RNG.
//!
//! # Determinism strategy
//!
//! Exactly one generator exists per run.  It is owned by the simulation loop
//! and lent by `&mut` to every component that draws (agent factory, decision
//! context, grid sampling, roster shuffling).  Because the simulation thread
//! is the only caller and the call order is fixed by the round schedule, a
//! given seed always reproduces the same run.  Pathfinding workers never draw.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for every random decision in a run.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A fair coin flip.
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.0.r#gen::<bool>()
    }

    /// `base` plus a uniform integer in `[0, spread)`; `base` when `spread`
    /// is zero.
    #[inline]
    pub fn jitter(&mut self, base: u32, spread: u32) -> u32 {
        if spread == 0 {
            base
        } else {
            base + self.0.gen_range(0..spread)
        }
    }
}
