//! Default mode: play one scenario end to end, always taking the engine's
//! advice, then log the scorecard.

use std::path::PathBuf;

use bevy::prelude::*;

use simulation::session::StepResult;
use simulation::session_requests::{RequestSource, SessionOutcome, SessionRequest};
use simulation::summary::GameSummary;

use crate::engine::{build_engine_app, submit};

#[derive(Debug, Clone, PartialEq)]
pub struct AutoplayOptions {
    pub scenario_id: String,
    pub seed: Option<u64>,
    pub locale: String,
    pub replay_out: Option<PathBuf>,
}

pub fn run_autoplay(options: &AutoplayOptions) -> Result<GameSummary, String> {
    let mut app = build_engine_app();
    play(&mut app, options)
}

fn play(app: &mut App, options: &AutoplayOptions) -> Result<GameSummary, String> {
    let started = match submit(
        app,
        RequestSource::Autoplay,
        SessionRequest::Start {
            scenario_id: options.scenario_id.clone(),
            seed: options.seed,
        },
    ) {
        SessionOutcome::Started(started) => started,
        other => return Err(describe_failure(other)),
    };
    let game_id = started.game_id;

    let mut last = started.initial;
    while !(last.state.done || last.state.game_over) {
        log_hour(&last);
        let advice = last.recommendation.clone();
        last = match submit(
            app,
            RequestSource::Autoplay,
            SessionRequest::Step {
                game_id,
                action: advice.action,
                zone_id: advice.zone_id,
            },
        ) {
            SessionOutcome::Stepped(result) => result,
            other => return Err(describe_failure(other)),
        };
    }

    if let Some(path) = &options.replay_out {
        match submit(app, RequestSource::Autoplay, SessionRequest::Replay { game_id }) {
            SessionOutcome::Replay(replay) => {
                save::write_replay(path, &replay).map_err(|e| e.to_string())?;
            }
            other => return Err(describe_failure(other)),
        }
    }

    let summary = match submit(
        app,
        RequestSource::Autoplay,
        SessionRequest::Summary {
            game_id,
            locale: options.locale.clone(),
        },
    ) {
        SessionOutcome::Summary(summary) => summary,
        other => return Err(describe_failure(other)),
    };

    info!(
        "{}: score {} ({:?}), damage {:.1}, cost {:.1}, trust {:.1}",
        summary.ending_title,
        summary.final_score,
        summary.end_reason,
        summary.total_damage,
        summary.total_cost,
        summary.final_trust
    );
    info!("{}", summary.ending_description);
    Ok(summary)
}

fn log_hour(result: &StepResult) {
    let advice = &result.recommendation;
    info!(
        "t={} budget={:.1} trust={:.1} risk={:?} -> {} {}",
        result.t,
        result.state.budget,
        result.state.trust,
        result.forecast.risk_mean,
        advice.action,
        advice.zone_id.as_deref().unwrap_or("all zones")
    );
    for event in &result.events {
        info!("  {event}");
    }
}

fn describe_failure(outcome: SessionOutcome) -> String {
    match outcome {
        SessionOutcome::Error(message) => message,
        other => format!("unexpected outcome: {other:?}"),
    }
}
