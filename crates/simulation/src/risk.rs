//! Flood risk as a logistic function of storage above a zone's threshold.

use crate::config::{CRITICAL_RISK, FLOODED_RISK};

/// Largest `f64` strictly below 1.0.
const RISK_CEILING: f64 = 1.0 - f64::EPSILON / 2.0;

/// Flood risk for `storage` in a zone flooding at `threshold`.
///
/// `1 / (1 + e^-(storage - threshold))`, saturating just inside `(0, 1)`:
/// far from the threshold the plain logistic rounds to exactly 0.0 or 1.0 in
/// floating point, so the result is clamped to the nearest interior values.
pub fn flood_risk(storage: f64, threshold: f64) -> f64 {
    logistic(storage - threshold).clamp(f64::MIN_POSITIVE, RISK_CEILING)
}

/// Displayed as flooded.
pub fn is_flooded(risk: f64) -> bool {
    risk > FLOODED_RISK
}

/// Triggers the critical-flood event and its trust penalty during a step.
pub fn is_critical(risk: f64) -> bool {
    risk > CRITICAL_RISK
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
