//! Gameplay and advisory tuning constants.

// ---------------------------------------------------------------------------
// Budget and trust
// ---------------------------------------------------------------------------

/// Trust every session starts with.
pub const INITIAL_TRUST: f64 = 100.0;

/// Cost multiplier for a mitigation action applied to every zone at once.
pub const ALL_ZONES_COST_MULTIPLIER: f64 = 2.5;

/// Trust lost when an action is paid for with money the city does not have.
pub const DEBT_TRUST_PENALTY: f64 = 8.0;

/// Trust lost for every zone whose risk crosses [`CRITICAL_RISK`] in a step.
pub const CRITICAL_FLOOD_TRUST_PENALTY: f64 = 5.0;

/// The city council pays a grant every this many completed hours.
pub const GRANT_INTERVAL_HOURS: usize = 6;

/// Fixed part of the periodic council grant.
pub const GRANT_BASE: f64 = 5.0;

/// Trust-proportional part of the periodic council grant (scaled by trust / 100).
pub const GRANT_TRUST_BONUS: f64 = 15.0;

// ---------------------------------------------------------------------------
// Risk thresholds
// ---------------------------------------------------------------------------

/// A zone is displayed as flooded above this risk.
pub const FLOODED_RISK: f64 = 0.8;

/// Above this risk a step emits a critical-flood event and costs trust.
pub const CRITICAL_RISK: f64 = 0.85;

/// Aggregate (zone-averaged) risk counted as significant by the forecaster.
pub const SIGNIFICANT_AGGREGATE_RISK: f64 = 0.3;

// ---------------------------------------------------------------------------
// Monte Carlo
// ---------------------------------------------------------------------------

/// Lower bound of the multiplicative rainfall perturbation.
pub const RAIN_PERTURBATION_MIN: f64 = 0.6;

/// Upper bound of the multiplicative rainfall perturbation.
pub const RAIN_PERTURBATION_MAX: f64 = 1.4;

pub const FORECAST_HORIZON: usize = 3;
pub const FORECAST_SAMPLES: usize = 15;

pub const ROLLOUT_HORIZON: usize = 3;
pub const ROLLOUT_SAMPLES: usize = 60;

/// CVaR level: the tail is the worst `1 - CVAR_ALPHA` of rollouts (worst 20%).
pub const CVAR_ALPHA: f64 = 0.8;

/// Alpha is clamped below this so the tail never becomes empty by construction.
pub const CVAR_ALPHA_CEILING: f64 = 0.999;

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Funding is only considered when the budget is at or below this level...
pub const FUNDING_BUDGET_CEILING: f64 = 5.0;

/// ...and trust is strictly above this level.
pub const FUNDING_TRUST_FLOOR: f64 = 15.0;

/// Added to the funding trust cost to form its synthetic score.
pub const FUNDING_SCORE_OFFSET: f64 = 10.0;

/// Added to the CVaR of a candidate the current budget cannot pay for.
pub const UNAFFORDABLE_PENALTY: f64 = 8.0;

pub const CONFIDENCE_MIN: f64 = 0.6;
pub const CONFIDENCE_MAX: f64 = 0.99;

/// Guards the relative dispersion against a zero mean loss.
pub const CONFIDENCE_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Trailing window (hours) for the `rain_6h` observation.
pub const RAIN_WINDOW_HOURS: usize = 6;

/// Hours of dry weather used when a scenario's rainfall file is missing.
pub const DEFAULT_SERIES_HOURS: usize = 24;
