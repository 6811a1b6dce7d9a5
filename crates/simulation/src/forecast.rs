//! Short-horizon distribution of aggregate flood risk under rainfall
//! perturbation, shown to the player next to the recommendation.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::SIGNIFICANT_AGGREGATE_RISK;
use crate::engine_view::EngineView;
use crate::sim_rng::{perturb_rainfall, RandomSource};

/// Per-hour forecast statistics, one entry per forecast hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Forecast {
    pub risk_mean: Vec<f64>,
    /// Population standard deviation.
    pub risk_std: Vec<f64>,
    /// Fraction of draws whose aggregate risk exceeds 0.3.
    pub prob_critical: Vec<f64>,
}

impl Forecast {
    pub fn horizon(&self) -> usize {
        self.risk_mean.len()
    }
}

/// Forecast the next `horizon` hours with `samples` draws each.
///
/// Every draw advances each zone one hour from its *current* storage with no
/// mitigation, using the forecast hour's rainfall scaled by a uniform factor
/// in `[0.6, 1.4]`. The per-draw aggregate is the mean risk across zones.
pub fn forecast_risk(
    view: &EngineView<'_>,
    horizon: usize,
    samples: usize,
    rng: &mut dyn RandomSource,
) -> Forecast {
    let mut forecast = Forecast::default();
    let zone_count = view.config.zones.len();

    for h in 0..horizon {
        let base_rain = view.config.rain_at(view.hour + h);
        let mut risks = Vec::with_capacity(samples);

        for _ in 0..samples {
            let rain = perturb_rainfall(base_rain, rng);
            let total: f64 = view
                .zones()
                .map(|(_, params, storage)| view.advance_zone(storage, rain, 0.0, params).1)
                .sum();
            risks.push(if zone_count == 0 {
                0.0
            } else {
                total / zone_count as f64
            });
        }

        let (mean, std) = mean_and_std(&risks);
        let significant = risks
            .iter()
            .filter(|&&r| r > SIGNIFICANT_AGGREGATE_RISK)
            .count();
        let prob = if risks.is_empty() {
            0.0
        } else {
            significant as f64 / risks.len() as f64
        };

        forecast.risk_mean.push(round_to(mean, 4));
        forecast.risk_std.push(round_to(std, 4));
        forecast.prob_critical.push(round_to(prob, 4));
    }

    forecast
}

/// Mean and population standard deviation. `(0, 0)` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.max(0.0).sqrt())
}

/// Round to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
