//! Request executor system: drains the [`SessionRequestQueue`] each update
//! and runs every request against the [`SessionDirectory`], recording
//! outcomes in the [`SessionResultLog`].

use bevy::prelude::*;

use crate::directory::SessionDirectory;
use crate::scenario::ScenarioCatalog;
use crate::settings::AdvisorySettings;
use crate::sim_rng::{RandomSource, SimRng};
use crate::surrogate::TransitionModel;

use super::result_log::SessionResultLog;
use super::{SessionOutcome, SessionRequest, SessionRequestQueue};

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Drains all pending requests from the queue and executes them in order.
#[allow(clippy::too_many_arguments)]
pub fn execute_session_requests(
    mut queue: ResMut<SessionRequestQueue>,
    mut log: ResMut<SessionResultLog>,
    mut directory: ResMut<SessionDirectory>,
    mut catalog: ResMut<ScenarioCatalog>,
    mut rng: ResMut<SimRng>,
    model: Res<TransitionModel>,
    settings: Res<AdvisorySettings>,
) {
    for queued in queue.drain() {
        let outcome = execute_single(
            &queued.request,
            &mut directory,
            &mut catalog,
            &mut rng,
            &model,
            &settings,
        );
        if let Some(message) = outcome.error() {
            warn!("Request {} ({:?}) failed: {message}", queued.id, queued.source);
        }
        log.push(queued, outcome);
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

fn execute_single(
    request: &SessionRequest,
    directory: &mut SessionDirectory,
    catalog: &mut ScenarioCatalog,
    rng: &mut SimRng,
    model: &TransitionModel,
    settings: &AdvisorySettings,
) -> SessionOutcome {
    match request {
        SessionRequest::ListScenarios => SessionOutcome::Scenarios(catalog.listings()),
        SessionRequest::ReloadScenarios => match catalog.reload() {
            Ok(()) => SessionOutcome::Reloaded {
                count: catalog.len(),
            },
            Err(e) => SessionOutcome::Error(e.to_string()),
        },
        SessionRequest::Start { scenario_id, seed } => {
            let seed = seed.unwrap_or_else(|| rng.next_seed());
            outcome(
                directory.start(catalog, model, settings, scenario_id, seed),
                SessionOutcome::Started,
            )
        }
        SessionRequest::Step {
            game_id,
            action,
            zone_id,
        } => outcome(
            directory.step(*game_id, action, zone_id.as_deref()),
            SessionOutcome::Stepped,
        ),
        SessionRequest::State { game_id } => {
            outcome(directory.status(*game_id), SessionOutcome::State)
        }
        SessionRequest::Replay { game_id } => {
            outcome(directory.replay(*game_id), SessionOutcome::Replay)
        }
        SessionRequest::Summary { game_id, locale } => outcome(
            directory.summary(*game_id, locale),
            SessionOutcome::Summary,
        ),
    }
}

fn outcome<T, E: std::fmt::Display>(
    result: Result<T, E>,
    wrap: impl FnOnce(T) -> SessionOutcome,
) -> SessionOutcome {
    match result {
        Ok(value) => wrap(value),
        Err(e) => SessionOutcome::Error(e.to_string()),
    }
}
