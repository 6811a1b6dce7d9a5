//! End-of-game scorecard computed from a session's history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::localization::Localization;
use crate::scenario::{ZoneId, NOOP_ACTION_ID};
use crate::session::StepResult;

/// Cumulative damage at which the damage component of the score bottoms out.
const DAMAGE_CAP: f64 = 1000.0;

/// Cumulative spend at which the cost component of the score bottoms out.
const COST_CAP: f64 = 150.0;

const DAMAGE_WEIGHT: f64 = 0.5;
const COST_WEIGHT: f64 = 0.2;
const TRUST_WEIGHT: f64 = 0.3;

const MODEL_COMMANDER_SCORE: u32 = 85;
const RELIABLE_BUREAUCRAT_SCORE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndReason {
    TimeUp,
    TrustZero,
    InProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    /// 0..=100.
    pub final_score: u32,
    pub total_damage: f64,
    pub total_cost: f64,
    pub final_trust: f64,
    pub end_reason: EndReason,
    /// Share of non-idle decisions that matched the previous recommendation.
    pub ai_adoption_rate: f64,
    pub match_count: u32,
    pub decision_count: u32,
    pub flooded_hours_by_zone: BTreeMap<ZoneId, u32>,
    /// Hour with the highest step damage; the earliest wins ties.
    pub worst_hour: u32,
    pub ending_title: String,
    pub ending_description: String,
}

impl GameSummary {
    pub fn from_history(history: &[StepResult], locale: &str) -> Self {
        let mut total_damage = 0.0;
        let mut total_cost = 0.0;
        let mut match_count = 0;
        let mut decision_count = 0;
        let mut worst: Option<(u32, f64)> = None;
        let mut flooded_hours_by_zone: BTreeMap<ZoneId, u32> = BTreeMap::new();

        for (index, step) in history.iter().enumerate() {
            total_damage += step.reward.damage;
            total_cost += step.reward.cost;

            for zone in step.state.zones.values() {
                let hours = flooded_hours_by_zone.entry(zone.id.clone()).or_insert(0);
                if zone.flooded {
                    *hours += 1;
                }
            }

            match worst {
                Some((_, max)) if step.reward.damage <= max => {}
                _ => worst = Some((step.t, step.reward.damage)),
            }

            // The first entry is the start of the game, not a decision.
            if index == 0 || step.action == NOOP_ACTION_ID {
                continue;
            }
            decision_count += 1;
            let advised = &history[index - 1].recommendation;
            if step.action == advised.action && step.zone_id == advised.zone_id {
                match_count += 1;
            }
        }

        let last = history.last();
        let final_trust = last.map_or(0.0, |s| s.state.trust);
        let end_reason = match last {
            Some(s) if s.state.game_over => EndReason::TrustZero,
            Some(s) if s.state.done => EndReason::TimeUp,
            _ => EndReason::InProgress,
        };

        let final_score = score(total_damage, total_cost, final_trust);
        let ending = match end_reason {
            EndReason::TrustZero => "lost_trust",
            _ if final_score >= MODEL_COMMANDER_SCORE => "model_commander",
            _ if final_score >= RELIABLE_BUREAUCRAT_SCORE => "reliable_bureaucrat",
            _ => "poor_response",
        };
        let strings = Localization::shared();

        Self {
            final_score,
            total_damage,
            total_cost,
            final_trust,
            end_reason,
            ai_adoption_rate: if decision_count > 0 {
                f64::from(match_count) / f64::from(decision_count)
            } else {
                0.0
            },
            match_count,
            decision_count,
            flooded_hours_by_zone,
            worst_hour: worst.map_or(0, |(t, _)| t),
            ending_title: strings
                .t(locale, &format!("ending.{ending}.title"))
                .to_string(),
            ending_description: strings
                .t(locale, &format!("ending.{ending}.description"))
                .to_string(),
        }
    }
}

/// 50% damage avoided, 20% money saved, 30% trust kept; rounded to an integer.
pub fn score(total_damage: f64, total_cost: f64, final_trust: f64) -> u32 {
    let damage_norm = (total_damage / DAMAGE_CAP).min(1.0);
    let cost_norm = (total_cost / COST_CAP).min(1.0);
    let trust_norm = (final_trust / 100.0).min(1.0);
    let raw = 100.0
        * (DAMAGE_WEIGHT * (1.0 - damage_norm)
            + COST_WEIGHT * (1.0 - cost_norm)
            + TRUST_WEIGHT * trust_norm);
    raw.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::scenario::builtin_scenarios;
    use crate::session::GameSession;
    use crate::settings::AdvisorySettings;
    use crate::sim_rng::MidpointSource;
    use crate::surrogate::TransitionModel;

    fn weak_session() -> GameSession {
        let spec = builtin_scenarios()
            .into_iter()
            .find(|s| s.id == "weak")
            .unwrap();
        GameSession::start(
            Arc::new(spec),
            TransitionModel::fallback(),
            AdvisorySettings {
                rollout_samples: 4,
                forecast_samples: 4,
                ..AdvisorySettings::default()
            },
            Box::new(MidpointSource),
        )
        .0
    }

    #[test]
    fn test_score_formula() {
        assert_eq!(score(0.0, 0.0, 100.0), 100);
        assert_eq!(score(2000.0, 500.0, 0.0), 0);
        // 100 * (0.5 * 0.5 + 0.2 * 0.5 + 0.3 * 0.5) = 50
        assert_eq!(score(500.0, 75.0, 50.0), 50);
        assert_eq!(score(0.0, 0.0, 250.0), 100, "trust above 100 is capped");
    }

    #[test]
    fn test_in_progress_summary() {
        let mut session = weak_session();
        let advised = session.last_result().unwrap().recommendation.clone();
        let zone = advised.zone_id.as_deref();
        session.step(&advised.action, zone).unwrap();
        session.step("sandbag", Some("lowland")).unwrap();

        let summary = GameSummary::from_history(session.history(), "en");
        assert_eq!(summary.end_reason, EndReason::InProgress);
        assert_eq!(summary.flooded_hours_by_zone.len(), 3);

        let expected_decisions = if advised.action == "none" { 1 } else { 2 };
        assert_eq!(summary.decision_count, expected_decisions);
        assert!(summary.match_count <= summary.decision_count);
        assert!((0.0..=1.0).contains(&summary.ai_adoption_rate));
        let cost: f64 = session.history().iter().map(|s| s.reward.cost).sum();
        assert_eq!(summary.total_cost, cost);
    }

    #[test]
    fn test_quiet_shift_is_model_commander() {
        let mut session = weak_session();
        while !session.is_terminal() {
            session.step("none", None).unwrap();
        }
        let summary = GameSummary::from_history(session.history(), "en");
        assert_eq!(summary.end_reason, EndReason::TimeUp);
        assert_eq!(summary.decision_count, 0);
        assert_eq!(summary.ai_adoption_rate, 0.0);
        assert_eq!(summary.total_cost, 0.0);
        assert!(summary.final_score >= 85, "score {}", summary.final_score);
        assert_eq!(summary.ending_title, "Model Commander");

        let zh = GameSummary::from_history(session.history(), "zh");
        assert_eq!(zh.ending_title, "模範指揮官");
    }

    #[test]
    fn test_trust_collapse_ending() {
        let mut session = weak_session();
        while !session.is_terminal() {
            session.step("funding", None).unwrap();
        }
        let summary = GameSummary::from_history(session.history(), "en");
        assert_eq!(summary.end_reason, EndReason::TrustZero);
        assert_eq!(summary.final_trust, 0.0);
        assert_eq!(summary.ending_title, "Lost Public Trust");
    }

    #[test]
    fn test_empty_history() {
        let summary = GameSummary::from_history(&[], "en");
        assert_eq!(summary.end_reason, EndReason::InProgress);
        assert_eq!(summary.worst_hour, 0);
        assert!(summary.flooded_hours_by_zone.is_empty());
    }
}
