use std::collections::BTreeMap;
use std::fmt;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::advisory::Recommendation;
use crate::forecast::Forecast;
use crate::localization::{Localization, DEFAULT_LOCALE};
use crate::scenario::{ActionId, ZoneId};

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Rainfall seen by the player at a result's hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Observation {
    /// Rain in the most recently played hour.
    pub rain: f64,
    /// Sum over the last six played hours.
    pub rain_6h: f64,
    /// Sum since the start of the scenario.
    pub accum: f64,
}

impl Observation {
    /// Observation after `hour` played hours. All zeros at hour 0.
    pub fn at_hour(rainfall: &[f64], hour: usize) -> Self {
        if hour == 0 || rainfall.is_empty() {
            return Self::default();
        }
        let idx = (hour - 1).min(rainfall.len() - 1);
        let window_start = idx.saturating_sub(crate::config::RAIN_WINDOW_HOURS - 1);
        Self {
            rain: rainfall[idx],
            rain_6h: rainfall[window_start..=idx].iter().sum(),
            accum: rainfall[..=idx].iter().sum(),
        }
    }
}

// ---------------------------------------------------------------------------
// State snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ZoneState {
    pub id: ZoneId,
    pub name: String,
    pub storage: f64,
    pub risk: f64,
    /// Risk above 0.8.
    pub flooded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum FailureReason {
    #[serde(rename = "PUBLIC_OUTRAGE")]
    PublicOutrage,
}

/// Player-facing state after a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct StateSnapshot {
    pub zones: BTreeMap<ZoneId, ZoneState>,
    pub budget: f64,
    /// `max(trust, 0)` rounded to one decimal.
    pub trust: f64,
    pub cooldowns: BTreeMap<ActionId, u32>,
    /// Every hour of the scenario has been played.
    pub done: bool,
    pub game_over: bool,
    pub failure_reason: Option<FailureReason>,
}

// ---------------------------------------------------------------------------
// Reward and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Reward {
    /// `-(damage + cost)` for this step.
    pub delta: f64,
    pub total: f64,
    pub damage: f64,
    pub cost: f64,
}

/// Something noteworthy that happened during a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepEvent {
    EmergencyFunding { budget_gain: f64, trust_penalty: f64 },
    CriticalFlooding { zone: ZoneId },
    CouncilGrant { amount: f64, trust: f64 },
    CommanderRemoved,
}

impl StepEvent {
    /// Text in `locale`.
    pub fn describe(&self, locale: &str) -> String {
        let strings = Localization::shared();
        match self {
            StepEvent::EmergencyFunding {
                budget_gain,
                trust_penalty,
            } => {
                let gain = format!("{budget_gain:.1}");
                let penalty = format!("{trust_penalty:.1}");
                strings.format(
                    locale,
                    "event.emergency_funding",
                    &[("gain", gain.as_str()), ("penalty", penalty.as_str())],
                )
            }
            StepEvent::CriticalFlooding { zone } => {
                strings.format(locale, "event.critical_flooding", &[("zone", zone.as_str())])
            }
            StepEvent::CouncilGrant { amount, trust } => {
                let amount = format!("{amount:.1}");
                let trust = format!("{trust:.1}");
                strings.format(
                    locale,
                    "event.council_grant",
                    &[("amount", amount.as_str()), ("trust", trust.as_str())],
                )
            }
            StepEvent::CommanderRemoved => strings.t(locale, "event.commander_removed").to_string(),
        }
    }
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(DEFAULT_LOCALE))
    }
}

// ---------------------------------------------------------------------------
// Step result
// ---------------------------------------------------------------------------

/// Immutable record of one played hour (or of the start of the game).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct StepResult {
    pub action: ActionId,
    pub zone_id: Option<ZoneId>,
    /// Hours played when this result was recorded.
    pub t: u32,
    pub obs: Observation,
    pub state: StateSnapshot,
    pub forecast: Forecast,
    pub recommendation: Recommendation,
    pub reward: Reward,
    pub events: Vec<StepEvent>,
}

/// Ordered history of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SessionReplay {
    pub scenario_id: String,
    pub history: Vec<StepResult>,
}
