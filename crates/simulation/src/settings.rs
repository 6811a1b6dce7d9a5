//! Runtime configuration: Monte Carlo sizing for the advisory engine and the
//! on-disk sources for scenarios and surrogate weights.

use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{
    CVAR_ALPHA, FORECAST_HORIZON, FORECAST_SAMPLES, ROLLOUT_HORIZON, ROLLOUT_SAMPLES,
};

/// Environment variable naming the directory with `scenario_params.json`.
pub const SCENARIO_DIR_ENV: &str = "FLOOD_SCENARIO_DIR";

/// Environment variable naming the surrogate weights JSON file.
pub const MODEL_WEIGHTS_ENV: &str = "FLOOD_MODEL_WEIGHTS";

/// Sample counts and horizons used by the forecaster and the CVaR evaluator.
///
/// Sessions copy this at start, so changing the resource only affects games
/// started afterwards.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisorySettings {
    pub forecast_horizon: usize,
    pub forecast_samples: usize,
    pub rollout_horizon: usize,
    pub rollout_samples: usize,
    pub cvar_alpha: f64,
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        Self {
            forecast_horizon: FORECAST_HORIZON,
            forecast_samples: FORECAST_SAMPLES,
            rollout_horizon: ROLLOUT_HORIZON,
            rollout_samples: ROLLOUT_SAMPLES,
            cvar_alpha: CVAR_ALPHA,
        }
    }
}

/// Where scenario definitions and trained weights come from.
///
/// `None` means "use the built-in fallback": the built-in scenario catalog
/// and the closed-form transition formula respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSources {
    pub scenario_dir: Option<PathBuf>,
    pub weights_path: Option<PathBuf>,
}

impl EngineSources {
    /// Read [`SCENARIO_DIR_ENV`] and [`MODEL_WEIGHTS_ENV`]. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            scenario_dir: env_path(SCENARIO_DIR_ENV),
            weights_path: env_path(MODEL_WEIGHTS_ENV),
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
