use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{FUNDING_BUDGET_CEILING, FUNDING_TRUST_FLOOR};
use crate::localization::{Localization, SUPPORTED_LOCALES};
use crate::scenario::ZoneId;

/// How the winning candidate was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryMethod {
    /// Tail loss over Monte Carlo rainfall rollouts.
    Cvar,
    /// The budget-relief heuristic score.
    FundingHeuristic,
}

/// Reason block in one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LocalizedReasons {
    pub summary: String,
    pub chosen_action: String,
    pub risk_focus: String,
    pub budget_note: String,
}

/// Why the advisor chose what it chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Explanation {
    pub method: AdvisoryMethod,
    /// Zone with the largest mean simulated damage among the winner's rollouts.
    pub primary_driver: Option<ZoneId>,
    /// Whether the current budget covers the chosen action.
    pub affordable: bool,
    pub top_reasons: Vec<String>,
    /// Keyed by locale code.
    pub localized: BTreeMap<String, LocalizedReasons>,
}

pub(crate) struct ExplanationInput<'a> {
    pub method: AdvisoryMethod,
    pub action: &'a str,
    pub zone: Option<&'a str>,
    pub primary_driver: Option<ZoneId>,
    pub affordable: bool,
    pub horizon: usize,
    pub alpha: f64,
}

pub(crate) fn build_explanation(input: ExplanationInput<'_>) -> Explanation {
    let strings = Localization::shared();
    let tail = format!("{:.0}", (1.0 - input.alpha) * 100.0);
    let horizon = input.horizon.to_string();
    let driver = input.primary_driver.as_deref();

    let method_reason = match input.method {
        AdvisoryMethod::Cvar => format!(
            "CVaR (worst {tail}%) over {horizon}-hour horizon with Monte Carlo rainfall perturbations"
        ),
        AdvisoryMethod::FundingHeuristic => format!(
            "Funding heuristic: budget at or below ${FUNDING_BUDGET_CEILING:.0} \
             while trust stays above {FUNDING_TRUST_FLOOR:.0}%"
        ),
    };
    let top_reasons = vec![
        method_reason,
        format!(
            "Primary projected damage contribution: {}",
            driver.unwrap_or("N/A")
        ),
        "Includes budget/trust-aware penalty to avoid infeasible actions".to_string(),
    ];

    let localized = SUPPORTED_LOCALES
        .iter()
        .map(|&locale| {
            let zone_label = input
                .zone
                .map(|z| strings.zone_label(locale, z))
                .unwrap_or_default();
            let driver_label = driver
                .map(|z| strings.zone_label(locale, z))
                .unwrap_or_default();
            let budget_key = if input.affordable {
                "advisory.budget_ok"
            } else {
                "advisory.budget_debt"
            };
            let reasons = LocalizedReasons {
                summary: strings.format(
                    locale,
                    "advisory.summary",
                    &[("tail", tail.as_str()), ("horizon", horizon.as_str())],
                ),
                chosen_action: strings
                    .format(
                        locale,
                        "advisory.chosen_action",
                        &[("action", input.action), ("zone", zone_label.as_str())],
                    )
                    .trim()
                    .to_string(),
                risk_focus: strings
                    .format(locale, "advisory.risk_focus", &[("zone", driver_label.as_str())])
                    .trim()
                    .to_string(),
                budget_note: strings.t(locale, budget_key).to_string(),
            };
            (locale.to_string(), reasons)
        })
        .collect();

    Explanation {
        method: input.method,
        primary_driver: input.primary_driver,
        affordable: input.affordable,
        top_reasons,
        localized,
    }
}
