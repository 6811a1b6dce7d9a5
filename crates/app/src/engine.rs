//! Headless engine app shared by the agent and autoplay modes.

use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::session_requests::{
    RequestSource, SessionOutcome, SessionRequest, SessionRequestQueue, SessionResultLog,
};
use simulation::FloodSimulationPlugin;

/// Build a minimal Bevy App with the flood engine and logging, no rendering.
///
/// `LogPlugin` writes to stderr, so stdout stays free for protocol output.
pub fn build_engine_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LogPlugin::default());
    app.add_plugins(FloodSimulationPlugin::from_env());
    app.finish();
    app.cleanup();

    // Initial update so Startup systems execute and resources initialize.
    app.update();
    app
}

/// Queue one request, run one update so the executor processes it, and
/// return its outcome.
pub fn submit(app: &mut App, source: RequestSource, request: SessionRequest) -> SessionOutcome {
    let id = app
        .world_mut()
        .resource_mut::<SessionRequestQueue>()
        .push(source, request);

    app.update();

    app.world()
        .get_resource::<SessionResultLog>()
        .and_then(|log| log.find(id).cloned())
        .unwrap_or_else(|| SessionOutcome::Error(format!("request {id} produced no outcome")))
}
