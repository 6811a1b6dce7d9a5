//! Flood-mitigation simulation and advisory engine.
//!
//! Zones accumulate stormwater hour by hour under a scenario's rainfall
//! series. Each hour a commander picks one action; the engine advances the
//! session, then publishes a Monte Carlo risk forecast and a CVaR-ranked
//! recommendation for the next hour.

use bevy::prelude::*;

pub mod advisory;
pub mod agent_protocol;
pub mod config;
pub mod directory;
pub mod engine_view;
pub mod forecast;
pub mod localization;
pub mod risk;
pub mod scenario;
pub mod session;
pub mod session_requests;
pub mod settings;
pub mod sim_rng;
pub mod summary;
pub mod surrogate;

use directory::SessionDirectory;
use scenario::ScenarioCatalog;
use session_requests::SessionRequestsPlugin;
use settings::{AdvisorySettings, EngineSources};
use sim_rng::SimRng;
use surrogate::TransitionModel;

/// Installs the catalog, the transition model, the advisory settings, the
/// master RNG, the session directory and the request executor.
#[derive(Debug, Clone, Default)]
pub struct FloodSimulationPlugin {
    pub sources: EngineSources,
}

impl FloodSimulationPlugin {
    /// Sources taken from `FLOOD_SCENARIO_DIR` and `FLOOD_MODEL_WEIGHTS`.
    pub fn from_env() -> Self {
        Self {
            sources: EngineSources::from_env(),
        }
    }
}

impl Plugin for FloodSimulationPlugin {
    fn build(&self, app: &mut App) {
        let catalog = load_catalog(&self.sources);
        let model = TransitionModel::load_or_fallback(self.sources.weights_path.as_deref());

        app.insert_resource(catalog)
            .insert_resource(model)
            .init_resource::<AdvisorySettings>()
            .init_resource::<SimRng>()
            .init_resource::<SessionDirectory>()
            .add_plugins(SessionRequestsPlugin);
    }
}

fn load_catalog(sources: &EngineSources) -> ScenarioCatalog {
    let Some(dir) = &sources.scenario_dir else {
        info!("No scenario directory configured; using built-in storms");
        return ScenarioCatalog::default();
    };
    match ScenarioCatalog::from_dir(dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(
                "Failed to load scenarios from {}: {e}; using built-in storms",
                dir.display()
            );
            ScenarioCatalog::default()
        }
    }
}
