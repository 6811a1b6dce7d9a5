use std::path::Path;
use std::sync::Arc;

use bevy::prelude::*;

use super::weights::{InferenceError, SurrogateWeights, FEATURE_COUNT};
use crate::scenario::ZoneParameters;

/// The storage transition shared by live steps, the forecaster and the
/// CVaR evaluator.
///
/// Holds optional trained weights. Prediction is pure: identical inputs give
/// identical outputs, and any inference failure falls back to the
/// closed-form formula instead of surfacing.
#[derive(Resource, Debug, Clone, Default)]
pub struct TransitionModel {
    weights: Option<Arc<SurrogateWeights>>,
}

impl TransitionModel {
    /// Closed-form model only.
    pub fn fallback() -> Self {
        Self { weights: None }
    }

    pub fn with_weights(weights: SurrogateWeights) -> Self {
        Self {
            weights: Some(Arc::new(weights)),
        }
    }

    /// Load weights from `path` if given. Missing or malformed weights are
    /// logged and the closed-form model is used.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No surrogate weights configured; using closed-form transition");
            return Self::fallback();
        };
        match SurrogateWeights::load_json(path) {
            Ok(weights) => {
                info!(
                    "Surrogate weights loaded from {} (hidden layers {}x{})",
                    path.display(),
                    weights.b_0.len(),
                    weights.b_1.len()
                );
                Self::with_weights(weights)
            }
            Err(e) => {
                warn!(
                    "Failed to load surrogate weights from {}: {e}; using closed-form transition",
                    path.display()
                );
                Self::fallback()
            }
        }
    }

    pub fn has_weights(&self) -> bool {
        self.weights.is_some()
    }

    /// Next-hour storage, never negative.
    pub fn predict_next_storage(
        &self,
        storage: f64,
        rain: f64,
        effect: f64,
        zone: &ZoneParameters,
    ) -> f64 {
        match self.infer(storage, rain, effect, zone) {
            Ok(next) => next.max(0.0),
            Err(_) => closed_form_storage(storage, rain, effect, zone),
        }
    }

    /// Run the trained model, or report why it cannot be used.
    pub fn infer(
        &self,
        storage: f64,
        rain: f64,
        effect: f64,
        zone: &ZoneParameters,
    ) -> Result<f64, InferenceError> {
        let Some(weights) = &self.weights else {
            return Err(InferenceError::NonFinite("weights unavailable"));
        };
        let features: [f64; FEATURE_COUNT] = [storage, rain, effect, zone.a, zone.b, zone.c];
        weights.infer(&features)
    }
}

/// `max(a·storage + b·rain − c·effect, 0)`.
pub fn closed_form_storage(storage: f64, rain: f64, effect: f64, zone: &ZoneParameters) -> f64 {
    (zone.a * storage + zone.b * rain - zone.c * effect).max(0.0)
}
