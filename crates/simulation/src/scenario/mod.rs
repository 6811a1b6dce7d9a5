//! Scenario definitions: zones, actions and the hourly rainfall series.
//!
//! Scenarios come from a directory (`scenario_params.json` plus one rainfall
//! CSV per scenario) or, when none is configured, from the built-in storms.
//! The catalog can be reloaded at runtime; running sessions keep the
//! `Arc<ScenarioSpec>` they were started with.

mod builtin;
mod error;
mod loader;
mod types;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;

pub use builtin::{builtin_scenarios, RainShape};
pub use error::ScenarioError;
pub use loader::{load_rain_series, load_scenario_dir, parse_rain_csv, SCENARIO_INDEX_FILE};
pub use types::{
    ActionDefinition, ActionId, ActionKind, DisplayText, ScenarioAction, ScenarioConfig,
    ScenarioListing, ScenarioSpec, ZoneId, ZoneParameters, FUNDING_ACTION_ID, NOOP_ACTION_ID,
};

/// All scenarios a game can be started from, keyed by id.
#[derive(Resource, Debug, Clone)]
pub struct ScenarioCatalog {
    source: Option<PathBuf>,
    scenarios: BTreeMap<String, Arc<ScenarioSpec>>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::from_specs(builtin_scenarios())
    }
}

impl ScenarioCatalog {
    /// A catalog holding exactly `specs`, with no backing directory.
    pub fn from_specs(specs: Vec<ScenarioSpec>) -> Self {
        Self {
            source: None,
            scenarios: index(specs),
        }
    }

    /// Load a catalog from a scenario directory.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self, ScenarioError> {
        let dir = dir.into();
        let specs = load_scenario_dir(&dir)?;
        let catalog = Self {
            source: Some(dir),
            scenarios: index(specs),
        };
        catalog.log_loaded();
        Ok(catalog)
    }

    /// Re-read the backing directory. Built-in catalogs are left unchanged.
    ///
    /// On error the previously loaded scenarios stay in place.
    pub fn reload(&mut self) -> Result<(), ScenarioError> {
        let Some(dir) = &self.source else {
            return Ok(());
        };
        self.scenarios = index(load_scenario_dir(dir)?);
        self.log_loaded();
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Arc<ScenarioSpec>, ScenarioError> {
        self.scenarios
            .get(id)
            .cloned()
            .ok_or_else(|| ScenarioError::UnknownScenario(id.to_string()))
    }

    pub fn listings(&self) -> Vec<ScenarioListing> {
        self.scenarios
            .values()
            .map(|spec| ScenarioListing::from(spec.as_ref()))
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    fn log_loaded(&self) {
        info!(
            "Loaded {} scenarios: {:?}",
            self.scenarios.len(),
            self.ids().collect::<Vec<_>>()
        );
    }
}

fn index(specs: Vec<ScenarioSpec>) -> BTreeMap<String, Arc<ScenarioSpec>> {
    specs
        .into_iter()
        .map(|spec| (spec.id.clone(), Arc::new(spec)))
        .collect()
}
