use bevy::prelude::*;

use super::*;
use crate::settings::AdvisorySettings;
use crate::FloodSimulationPlugin;

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(FloodSimulationPlugin::default());
    app.insert_resource(AdvisorySettings {
        forecast_samples: 4,
        rollout_samples: 8,
        ..AdvisorySettings::default()
    });
    app
}

fn run(app: &mut App, request: SessionRequest) -> SessionOutcome {
    let id = app
        .world_mut()
        .resource_mut::<SessionRequestQueue>()
        .push(RequestSource::Agent, request);
    app.update();
    app.world()
        .resource::<SessionResultLog>()
        .find(id)
        .cloned()
        .unwrap()
}

fn start(app: &mut App, scenario_id: &str, seed: Option<u64>) -> crate::directory::StartedGame {
    match run(
        app,
        SessionRequest::Start {
            scenario_id: scenario_id.to_string(),
            seed,
        },
    ) {
        SessionOutcome::Started(started) => started,
        other => panic!("expected Started, got {other:?}"),
    }
}

#[test]
fn test_request_serialization() {
    let request = SessionRequest::Step {
        game_id: uuid::Uuid::nil(),
        action: "pump".to_string(),
        zone_id: Some("lowland".to_string()),
    };
    let json = serde_json::to_string(&request).unwrap();
    let decoded: SessionRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(request, decoded);
}

#[test]
fn test_list_scenarios() {
    let mut app = test_app();
    let SessionOutcome::Scenarios(listings) = run(&mut app, SessionRequest::ListScenarios) else {
        panic!("expected scenario listings");
    };
    let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["medium", "strong", "weak"]);
}

#[test]
fn test_reload_builtin_catalog_is_noop() {
    let mut app = test_app();
    assert_eq!(
        run(&mut app, SessionRequest::ReloadScenarios),
        SessionOutcome::Reloaded { count: 3 }
    );
}

#[test]
fn test_start_step_state_replay_summary() {
    let mut app = test_app();
    let started = start(&mut app, "medium", Some(11));
    assert_eq!(started.initial.t, 0);
    let game_id = started.game_id;

    let outcome = run(
        &mut app,
        SessionRequest::Step {
            game_id,
            action: "sandbag".to_string(),
            zone_id: Some("lowland".to_string()),
        },
    );
    let SessionOutcome::Stepped(result) = outcome else {
        panic!("expected Stepped, got {outcome:?}");
    };
    assert_eq!(result.t, 1);
    assert_eq!(result.reward.cost, 4.0);

    let SessionOutcome::State(status) = run(&mut app, SessionRequest::State { game_id }) else {
        panic!("expected State");
    };
    assert_eq!(status.t, 1);
    assert_eq!(status.state, result.state);

    let SessionOutcome::Replay(replay) = run(&mut app, SessionRequest::Replay { game_id }) else {
        panic!("expected Replay");
    };
    assert_eq!(replay.scenario_id, "medium");
    assert_eq!(replay.history.len(), 2);

    let SessionOutcome::Summary(summary) = run(
        &mut app,
        SessionRequest::Summary {
            game_id,
            locale: "en".to_string(),
        },
    ) else {
        panic!("expected Summary");
    };
    assert_eq!(summary.decision_count, 1);
    assert_eq!(summary.total_cost, 4.0);
}

#[test]
fn test_invalid_input_is_reported_not_applied() {
    let mut app = test_app();
    let game_id = start(&mut app, "weak", Some(1)).game_id;

    let outcome = run(
        &mut app,
        SessionRequest::Step {
            game_id,
            action: "teleport".to_string(),
            zone_id: None,
        },
    );
    assert_eq!(outcome.error(), Some("Unknown action: teleport"));
    assert!(!outcome.is_success());

    let SessionOutcome::State(status) = run(&mut app, SessionRequest::State { game_id }) else {
        panic!("expected State");
    };
    assert_eq!(status.t, 0);

    let outcome = run(
        &mut app,
        SessionRequest::Start {
            scenario_id: "tsunami".to_string(),
            seed: None,
        },
    );
    assert!(outcome.error().is_some_and(|m| m.contains("tsunami")));
}

#[test]
fn test_explicit_seed_reproduces_session() {
    let mut app = test_app();
    let a = start(&mut app, "strong", Some(99));
    let b = start(&mut app, "strong", Some(99));
    assert_ne!(a.game_id, b.game_id);
    assert_eq!(a.initial, b.initial);
}

#[test]
fn test_requests_execute_in_queue_order() {
    let mut app = test_app();
    let game_id = start(&mut app, "weak", Some(5)).game_id;

    let ids: Vec<u64> = {
        let mut queue = app.world_mut().resource_mut::<SessionRequestQueue>();
        (0..3)
            .map(|_| {
                queue.push(
                    RequestSource::Autoplay,
                    SessionRequest::Step {
                        game_id,
                        action: "none".to_string(),
                        zone_id: None,
                    },
                )
            })
            .collect()
    };
    app.update();

    let log = app.world().resource::<SessionResultLog>();
    let hours: Vec<u32> = ids
        .iter()
        .map(|id| match log.find(*id) {
            Some(SessionOutcome::Stepped(r)) => r.t,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(hours, vec![1, 2, 3]);
}
