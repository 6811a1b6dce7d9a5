//! Risk-sensitive action advisor.
//!
//! Every candidate `(action, zone)` is scored by the CVaR of its simulated
//! loss over a short horizon under rainfall uncertainty; the lowest score
//! wins. See [`recommend`].

mod explanation;
mod rollout;
mod selector;

pub use explanation::{AdvisoryMethod, Explanation, LocalizedReasons};
pub use rollout::{evaluate_rollout, tail_mean, RolloutOutcome, RolloutParams};
pub use selector::{confidence, primary_driver, recommend, Recommendation};

use crate::settings::AdvisorySettings;

impl From<&AdvisorySettings> for RolloutParams {
    fn from(settings: &AdvisorySettings) -> Self {
        Self {
            horizon: settings.rollout_horizon,
            samples: settings.rollout_samples,
            alpha: settings.cvar_alpha,
        }
    }
}
