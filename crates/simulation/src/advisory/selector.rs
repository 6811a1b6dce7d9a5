//! Picks the candidate with the lowest tail loss.

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::explanation::{build_explanation, AdvisoryMethod, Explanation, ExplanationInput};
use super::rollout::{evaluate_rollout, RolloutParams};
use crate::config::{
    CONFIDENCE_EPSILON, CONFIDENCE_MAX, CONFIDENCE_MIN, FUNDING_BUDGET_CEILING,
    FUNDING_SCORE_OFFSET, FUNDING_TRUST_FLOOR, UNAFFORDABLE_PENALTY,
};
use crate::engine_view::EngineView;
use crate::forecast::{mean_and_std, round_to};
use crate::scenario::{ActionId, ActionKind, ZoneId, NOOP_ACTION_ID};
use crate::sim_rng::RandomSource;

/// The advisor's suggestion for the next step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Recommendation {
    pub action: ActionId,
    pub zone_id: Option<ZoneId>,
    /// Score of the winner (CVaR plus any penalty), 2 decimals.
    pub expected_loss: f64,
    /// 0.6..=0.99, 2 decimals.
    pub confidence: f64,
    pub explanation: Explanation,
}

struct Best {
    action: ActionId,
    kind: ActionKind,
    zone: Option<ZoneId>,
    score: f64,
    method: AdvisoryMethod,
    losses: Vec<f64>,
    zone_damage: BTreeMap<ZoneId, f64>,
}

/// Evaluate every candidate and return the argmin-score one.
///
/// Candidates are enumerated in action id order; mitigation actions expand
/// to one candidate per zone in zone id order. Ties keep the first candidate.
pub fn recommend(
    view: &EngineView<'_>,
    params: RolloutParams,
    rng: &mut dyn RandomSource,
) -> Recommendation {
    let mut best: Option<Best> = None;

    for action in &view.config.actions {
        match action.kind {
            ActionKind::Funding { trust_cost, .. } => {
                if view.budget > FUNDING_BUDGET_CEILING || view.trust <= FUNDING_TRUST_FLOOR {
                    continue;
                }
                let score = trust_cost + FUNDING_SCORE_OFFSET;
                consider(
                    &mut best,
                    Best {
                        action: action.id.clone(),
                        kind: action.kind,
                        zone: None,
                        score,
                        method: AdvisoryMethod::FundingHeuristic,
                        losses: vec![score],
                        zone_damage: view.zones().map(|(id, _, _)| (id.clone(), 0.0)).collect(),
                    },
                );
            }
            ActionKind::Noop => {
                let outcome = evaluate_rollout(view, &action.kind, None, params, rng);
                consider(
                    &mut best,
                    Best {
                        action: action.id.clone(),
                        kind: action.kind,
                        zone: None,
                        score: outcome.cvar,
                        method: AdvisoryMethod::Cvar,
                        losses: outcome.losses,
                        zone_damage: outcome.zone_damage,
                    },
                );
            }
            ActionKind::Mitigation { cost, .. } => {
                for zone_id in view.config.zones.keys() {
                    let outcome =
                        evaluate_rollout(view, &action.kind, Some(zone_id.as_str()), params, rng);
                    let mut score = outcome.cvar;
                    if view.budget < cost {
                        score += UNAFFORDABLE_PENALTY;
                    }
                    consider(
                        &mut best,
                        Best {
                            action: action.id.clone(),
                            kind: action.kind,
                            zone: Some(zone_id.clone()),
                            score,
                            method: AdvisoryMethod::Cvar,
                            losses: outcome.losses,
                            zone_damage: outcome.zone_damage,
                        },
                    );
                }
            }
        }
    }

    let best = best.unwrap_or_else(|| Best {
        action: NOOP_ACTION_ID.to_string(),
        kind: ActionKind::Noop,
        zone: None,
        score: 0.0,
        method: AdvisoryMethod::Cvar,
        losses: Vec::new(),
        zone_damage: BTreeMap::new(),
    });

    let explanation = build_explanation(ExplanationInput {
        method: best.method,
        action: &best.action,
        zone: best.zone.as_deref(),
        primary_driver: primary_driver(&best.zone_damage),
        affordable: view.budget >= best.kind.budget_cost(),
        horizon: params.horizon,
        alpha: params.alpha,
    });

    Recommendation {
        confidence: round_to(confidence(&best.losses), 2),
        expected_loss: round_to(best.score, 2),
        action: best.action,
        zone_id: best.zone,
        explanation,
    }
}

fn consider(best: &mut Option<Best>, candidate: Best) {
    let better = match best {
        Some(current) => candidate.score < current.score,
        None => true,
    };
    if better {
        *best = Some(candidate);
    }
}

/// `clamp(1 − 2·stddev/(|mean| + ε), 0.6, 0.99)`; 0.6 with no samples.
pub fn confidence(losses: &[f64]) -> f64 {
    if losses.is_empty() {
        return CONFIDENCE_MIN;
    }
    let (mean, std) = mean_and_std(losses);
    let relative = std / (mean.abs() + CONFIDENCE_EPSILON);
    (1.0 - 2.0 * relative).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// Zone with the largest mean damage; the first zone wins ties.
pub fn primary_driver(zone_damage: &BTreeMap<ZoneId, f64>) -> Option<ZoneId> {
    let mut driver: Option<(&ZoneId, f64)> = None;
    for (id, &damage) in zone_damage {
        match driver {
            Some((_, max)) if damage <= max => {}
            _ => driver = Some((id, damage)),
        }
    }
    driver.map(|(id, _)| id.clone())
}
