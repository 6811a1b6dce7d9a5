use std::collections::BTreeMap;
use std::sync::Arc;

use super::*;
use crate::risk::flood_risk;
use crate::scenario::{ActionDefinition, DisplayText, ScenarioConfig, ScenarioSpec, ZoneParameters};
use crate::settings::AdvisorySettings;
use crate::sim_rng::{MidpointSource, SimRng};
use crate::surrogate::TransitionModel;

fn zone(a: f64, b: f64, threshold: f64) -> ZoneParameters {
    ZoneParameters {
        a,
        b,
        c: 0.5,
        threshold,
        damage_scale: 10.0,
    }
}

fn three_zones() -> BTreeMap<String, ZoneParameters> {
    BTreeMap::from([
        ("industrial".to_string(), zone(0.8, 0.1, 5.0)),
        ("lowland".to_string(), zone(0.9, 0.15, 3.5)),
        ("residential".to_string(), zone(0.85, 0.12, 4.5)),
    ])
}

fn actions() -> BTreeMap<String, ActionDefinition> {
    BTreeMap::from([
        ("none".to_string(), ActionDefinition { cost: 0.0, effect: 0.0 }),
        ("pump".to_string(), ActionDefinition { cost: 8.0, effect: 4.0 }),
        ("funding".to_string(), ActionDefinition { cost: 12.0, effect: 30.0 }),
    ])
}

fn spec(
    budget: f64,
    zones: BTreeMap<String, ZoneParameters>,
    rainfall: Vec<f64>,
) -> Arc<ScenarioSpec> {
    Arc::new(ScenarioSpec {
        id: "test".to_string(),
        name: DisplayText::Plain("Test".to_string()),
        description: DisplayText::Plain(String::new()),
        time_step_hr: 1,
        config: ScenarioConfig::new(budget, zones, actions(), rainfall),
    })
}

fn fast_settings() -> AdvisorySettings {
    AdvisorySettings {
        forecast_samples: 4,
        rollout_samples: 8,
        ..AdvisorySettings::default()
    }
}

fn start(spec: Arc<ScenarioSpec>) -> GameSession {
    GameSession::start(
        spec,
        TransitionModel::fallback(),
        fast_settings(),
        Box::new(MidpointSource),
    )
    .0
}

// ---------------------------------------------------------------------------
// Start
// ---------------------------------------------------------------------------

#[test]
fn test_start_records_initial_result() {
    let session = start(spec(100.0, three_zones(), vec![1.0; 24]));
    assert_eq!(session.history().len(), 1);

    let initial = &session.history()[0];
    assert_eq!(initial.t, 0);
    assert_eq!(initial.action, "none");
    assert_eq!(initial.zone_id, None);
    assert_eq!(initial.obs, Observation::default());
    assert_eq!(initial.reward, Reward::default());
    assert!(initial.events.is_empty());
    assert_eq!(initial.state.budget, 100.0);
    assert_eq!(initial.state.trust, 100.0);
    assert_eq!(initial.forecast.horizon(), 3);
    assert!(!initial.state.done);
    assert!(initial.state.zones.values().all(|z| z.storage == 0.0));
    assert_eq!(initial.state.zones["lowland"].name, "Lowland");
    assert_eq!(initial.state.cooldowns.len(), 3);
}

// ---------------------------------------------------------------------------
// Full games
// ---------------------------------------------------------------------------

#[test]
fn test_dry_day_of_noops() {
    let mut session = start(spec(100.0, three_zones(), vec![0.0; 24]));

    let mut budget = 100.0;
    for hour in 1..=24u32 {
        let result = session.step("none", None).unwrap();
        assert_eq!(result.t, hour);
        if hour % 6 == 0 {
            budget += 20.0;
            assert!(
                matches!(result.events[..], [StepEvent::CouncilGrant { .. }]),
                "grant expected at hour {hour}: {:?}",
                result.events
            );
        } else {
            assert!(result.events.is_empty(), "no events at hour {hour}");
        }
        assert_eq!(result.state.budget, budget, "budget at hour {hour}");
        assert_eq!(result.state.trust, 100.0);
        assert!(result.state.zones.values().all(|z| z.storage == 0.0));
        assert_eq!(result.state.done, hour == 24, "done flag at hour {hour}");
    }
    assert_eq!(session.state().budget, 180.0);
    assert!(session.is_terminal());
}

#[test]
fn test_debt_costs_exactly_eight_trust() {
    let mut broke = start(spec(5.0, three_zones(), vec![0.0; 24]));
    let mut idle = start(spec(5.0, three_zones(), vec![0.0; 24]));

    let paid = broke.step("pump", Some("lowland")).unwrap();
    let waited = idle.step("none", None).unwrap();

    assert_eq!(waited.state.trust - paid.state.trust, 8.0);
    assert_eq!(paid.state.budget, -3.0, "full nominal cost is charged");
    assert_eq!(paid.reward.cost, 8.0);
}

#[test]
fn test_critical_flood_event_and_penalty() {
    let zones = BTreeMap::from([
        ("hill".to_string(), zone(0.5, 0.01, 50.0)),
        ("river".to_string(), zone(1.0, 1.0, 2.0)),
    ]);
    let mut session = start(spec(100.0, zones, vec![10.0; 24]));

    let result = session.step("none", None).unwrap();
    assert_eq!(result.state.trust, 95.0);
    assert_eq!(
        result.events,
        vec![StepEvent::CriticalFlooding {
            zone: "river".to_string()
        }]
    );
    assert!(result.events[0].to_string().contains("river"));
    assert!(result.state.zones["river"].flooded);
    assert!(!result.state.zones["hill"].flooded);
}

#[test]
fn test_all_zones_costs_two_and_a_half_times() {
    let mut single = start(spec(100.0, three_zones(), vec![0.0; 24]));
    let mut all = start(spec(100.0, three_zones(), vec![0.0; 24]));

    let one = single.step("pump", Some("industrial")).unwrap();
    let every = all.step("pump", None).unwrap();

    assert_eq!(one.reward.cost, 8.0);
    assert_eq!(every.reward.cost, 20.0);
    assert_eq!(100.0 - every.state.budget, 2.5 * (100.0 - one.state.budget));
}

#[test]
fn test_mitigation_targets_only_named_zone() {
    let mut session = start(spec(100.0, three_zones(), vec![20.0; 24]));
    session.step("none", None).unwrap();
    let before = session.state().storages.clone();

    session.step("pump", Some("lowland")).unwrap();
    let after = &session.state().storages;

    // lowland: 0.9·s + 0.15·20 − 0.5·4
    let expected = (0.9 * before["lowland"] + 0.15 * 20.0 - 0.5 * 4.0).max(0.0);
    assert!((after["lowland"] - expected).abs() < 1e-12);
    let untouched = 0.8 * before["industrial"] + 0.1 * 20.0;
    assert!((after["industrial"] - untouched).abs() < 1e-12);
}

#[test]
fn test_reward_accumulates() {
    let mut session = start(spec(100.0, three_zones(), vec![3.0; 24]));
    let first = session.step("pump", Some("lowland")).unwrap();
    let second = session.step("none", None).unwrap();

    let zones = &first.state.zones;
    let damage: f64 = zones.values().map(|z| z.risk * 10.0).sum();
    assert!((first.reward.damage - damage).abs() < 1e-9);
    assert!((first.reward.delta - (-damage - 8.0)).abs() < 1e-9);
    assert!((second.reward.total - (first.reward.delta + second.reward.delta)).abs() < 1e-9);
}

#[test]
fn test_funding_trades_trust_for_budget() {
    let mut session = start(spec(10.0, three_zones(), vec![0.0; 24]));
    let result = session.step("funding", None).unwrap();

    assert_eq!(result.state.budget, 40.0);
    assert_eq!(result.state.trust, 88.0);
    assert_eq!(result.reward.cost, 12.0, "funding is never scaled");
    assert!(result.state.zones.values().all(|z| z.storage == 0.0));
    assert_eq!(
        result.events,
        vec![StepEvent::EmergencyFunding {
            budget_gain: 30.0,
            trust_penalty: 12.0
        }]
    );
    assert!(result.events[0].to_string().starts_with("Emergency Funding: +$30.0"));
}

#[test]
fn test_funding_drains_storage_like_a_mitigation() {
    let mut session = start(spec(10.0, three_zones(), vec![20.0; 24]));
    session.step("none", None).unwrap();
    let before = session.state().storages.clone();
    assert!(before.values().all(|s| *s > 0.0));

    session.step("funding", None).unwrap();
    let after = &session.state().storages;

    for (id, params) in three_zones() {
        // a·s + b·20 − c·30, the gain doubling as the effect
        let expected = (params.a * before[&id] + params.b * 20.0 - params.c * 30.0).max(0.0);
        assert!((after[&id] - expected).abs() < 1e-12, "zone {id}");
    }
}

#[test]
fn test_targeted_funding_drains_only_that_zone() {
    let mut session = start(spec(10.0, three_zones(), vec![20.0; 24]));
    session.step("none", None).unwrap();
    let before = session.state().storages.clone();

    let result = session.step("funding", Some("lowland")).unwrap();
    let after = &session.state().storages;

    assert_eq!(result.reward.cost, 12.0);
    assert_eq!(after["lowland"], 0.0);
    let untouched = 0.8 * before["industrial"] + 0.1 * 20.0;
    assert!((after["industrial"] - untouched).abs() < 1e-12);
}

#[test]
fn test_trust_exhaustion_ends_game() {
    let mut session = start(spec(10.0, three_zones(), vec![0.0; 24]));
    let mut last = None;
    for _ in 0..9 {
        last = Some(session.step("funding", None).unwrap());
    }
    let last = last.unwrap();

    assert!(last.state.game_over);
    assert_eq!(last.state.failure_reason, Some(FailureReason::PublicOutrage));
    assert!(last.events.contains(&StepEvent::CommanderRemoved));
    assert_eq!(last.state.trust, 0.0, "display trust is clamped at zero");
    assert!(session.state().trust < 0.0, "internal trust is not clamped");
    assert_eq!(last.t, 9);

    let after = session.step("pump", Some("lowland")).unwrap();
    assert_eq!(after, last);
    assert_eq!(session.history().len(), 10);
}

#[test]
fn test_failure_reason_serializes_in_caps() {
    let json = serde_json::to_string(&FailureReason::PublicOutrage).unwrap();
    assert_eq!(json, "\"PUBLIC_OUTRAGE\"");
}

// ---------------------------------------------------------------------------
// Terminal and invalid input
// ---------------------------------------------------------------------------

#[test]
fn test_steps_after_done_are_idempotent() {
    let mut session = start(spec(100.0, three_zones(), vec![2.0; 3]));
    for _ in 0..3 {
        session.step("none", None).unwrap();
    }
    let last = session.last_result().cloned().unwrap();
    assert!(last.state.done);

    for (action, zone) in [("pump", Some("lowland")), ("none", None), ("bogus", Some("nowhere"))] {
        let again = session.step(action, zone).unwrap();
        assert_eq!(again, last);
    }
    assert_eq!(session.state().t, 3);
    assert_eq!(session.history().len(), 4);
}

#[test]
fn test_time_advances_by_one() {
    let mut session = start(spec(100.0, three_zones(), vec![1.0; 5]));
    for expected in 1..=5usize {
        let before = session.state().t;
        session.step("none", None).unwrap();
        assert_eq!(session.state().t, before + 1);
        assert_eq!(session.state().t, expected);
    }
}

#[test]
fn test_unknown_action_is_rejected_without_mutation() {
    let mut session = start(spec(100.0, three_zones(), vec![1.0; 5]));
    let before = session.state().clone();

    let err = session.step("dynamite", None).unwrap_err();
    assert_eq!(err, SessionError::UnknownAction("dynamite".to_string()));
    assert_eq!(err.to_string(), "Unknown action: dynamite");

    let err = session.step("pump", Some("atlantis")).unwrap_err();
    assert_eq!(err, SessionError::UnknownZone("atlantis".to_string()));

    assert_eq!(session.state(), &before);
}

#[test]
fn test_single_hour_series() {
    let mut session = start(spec(100.0, three_zones(), vec![4.0]));
    let result = session.step("none", None).unwrap();
    assert!(result.state.done);
    assert_eq!(result.obs.rain, 4.0);
    assert_eq!(session.step("none", None).unwrap(), result);
}

#[test]
fn test_empty_series_is_done_at_start() {
    let mut session = start(spec(100.0, three_zones(), Vec::new()));
    assert!(session.is_terminal());
    let initial = session.history()[0].clone();
    assert!(initial.state.done);
    assert_eq!(session.step("none", None).unwrap(), initial);
}

// ---------------------------------------------------------------------------
// Observation and advisory wiring
// ---------------------------------------------------------------------------

#[test]
fn test_observation_windows() {
    let rain: Vec<f64> = (1..=10).map(f64::from).collect();
    assert_eq!(Observation::at_hour(&rain, 0), Observation::default());

    let obs = Observation::at_hour(&rain, 3);
    assert_eq!(obs.rain, 3.0);
    assert_eq!(obs.rain_6h, 6.0);
    assert_eq!(obs.accum, 6.0);

    let obs = Observation::at_hour(&rain, 8);
    assert_eq!(obs.rain, 8.0);
    assert_eq!(obs.rain_6h, 3.0 + 4.0 + 5.0 + 6.0 + 7.0 + 8.0);
    assert_eq!(obs.accum, 36.0);

    let obs = Observation::at_hour(&rain, 50);
    assert_eq!(obs.rain, 10.0, "clamped to the last hour");
    assert_eq!(obs.accum, 55.0);
}

#[test]
fn test_forecast_uses_post_step_storage() {
    let mut session = start(spec(100.0, three_zones(), vec![30.0; 24]));
    let result = session.step("none", None).unwrap();

    let storages = &session.state().storages;
    let zones = three_zones();
    let mean: f64 = zones
        .iter()
        .map(|(id, zp)| flood_risk(zp.a * storages[id] + zp.b * 30.0, zp.threshold))
        .sum::<f64>()
        / 3.0;
    assert!((result.forecast.risk_mean[0] - mean).abs() < 1e-4);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let run = |seed| {
        let mut session = GameSession::start(
            spec(50.0, three_zones(), vec![6.0, 12.0, 20.0, 8.0]),
            TransitionModel::fallback(),
            fast_settings(),
            Box::new(SimRng::from_seed_u64(seed)),
        )
        .0;
        session.step("pump", Some("lowland")).unwrap();
        session.step("none", None).unwrap();
        session.replay()
    };
    assert_eq!(run(3), run(3));
    assert_eq!(run(3).scenario_id, "test");
    assert_eq!(run(3).history.len(), 3);
}
