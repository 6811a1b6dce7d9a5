//! Injectable randomness for the forecaster and the CVaR evaluator.
//!
//! Rainfall perturbation is the only non-deterministic input to the engine.
//! Everything that samples takes a `&mut dyn RandomSource`, so production
//! code plugs in a seeded `ChaCha8Rng` and tests can substitute a fixed
//! source to make rollouts exactly reproducible.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{RAIN_PERTURBATION_MAX, RAIN_PERTURBATION_MIN};

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

/// A source of uniform draws.
pub trait RandomSource {
    /// A uniform draw from the closed interval `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// A fresh seed for a child source.
    fn next_seed(&mut self) -> u64;
}

// ---------------------------------------------------------------------------
// SimRng
// ---------------------------------------------------------------------------

/// Deterministic RNG backed by `ChaCha8Rng`.
///
/// As a resource it is the master source the session directory draws
/// per-session seeds from; each session then owns its own `SimRng`.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.0.gen_range(low..=high)
    }

    fn next_seed(&mut self) -> u64 {
        self.0.gen()
    }
}

// ---------------------------------------------------------------------------
// MidpointSource
// ---------------------------------------------------------------------------

/// Always returns the middle of the requested interval.
///
/// For the rainfall band `[0.6, 1.4]` that is a factor of exactly 1.0, so
/// every rollout sees the unperturbed series.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSource;

impl RandomSource for MidpointSource {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0
    }

    fn next_seed(&mut self) -> u64 {
        DEFAULT_SEED
    }
}

// ---------------------------------------------------------------------------
// Perturbation
// ---------------------------------------------------------------------------

/// Scale `base_rain` by a uniform factor in `[0.6, 1.4]`.
pub fn perturb_rainfall(base_rain: f64, rng: &mut dyn RandomSource) -> f64 {
    base_rain * rng.uniform(RAIN_PERTURBATION_MIN, RAIN_PERTURBATION_MAX)
}
