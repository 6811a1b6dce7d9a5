//! Reads `scenario_params.json` and the per-scenario rainfall CSVs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::ScenarioError;
use super::types::{
    ActionDefinition, ActionId, DisplayText, ScenarioConfig, ScenarioSpec, ZoneId,
    ZoneParameters,
};
use crate::config::DEFAULT_SERIES_HOURS;

/// File name of the scenario index inside a scenario directory.
pub const SCENARIO_INDEX_FILE: &str = "scenario_params.json";

// ---------------------------------------------------------------------------
// File layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    id: String,
    name: DisplayText,
    description: DisplayText,
    csv: String,
    time_step_hr: u32,
    params: ScenarioParams,
    actions: BTreeMap<ActionId, ActionDefinition>,
}

#[derive(Debug, Deserialize)]
struct ScenarioParams {
    initial_budget: f64,
    zones: BTreeMap<ZoneId, ZoneParameters>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load every scenario described in `dir/scenario_params.json`.
pub fn load_scenario_dir(dir: &Path) -> Result<Vec<ScenarioSpec>, ScenarioError> {
    let index = fs::read_to_string(dir.join(SCENARIO_INDEX_FILE))?;
    let entries: Vec<ScenarioEntry> = serde_json::from_str(&index)?;

    let mut specs = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.params.zones.is_empty() {
            return Err(ScenarioError::Invalid(format!(
                "scenario '{}' defines no zones",
                entry.id
            )));
        }
        let rainfall = load_rain_series(&dir.join(&entry.csv));
        info!(
            "Scenario {}: {} hours, actions {:?}",
            entry.id,
            rainfall.len(),
            entry.actions.keys().collect::<Vec<_>>()
        );
        specs.push(ScenarioSpec {
            id: entry.id,
            name: entry.name,
            description: entry.description,
            time_step_hr: entry.time_step_hr,
            config: ScenarioConfig::new(
                entry.params.initial_budget,
                entry.params.zones,
                entry.actions,
                rainfall,
            ),
        });
    }
    Ok(specs)
}

/// Read an hourly rainfall CSV. A missing or unreadable file yields a dry day.
pub fn load_rain_series(path: &Path) -> Vec<f64> {
    match fs::read_to_string(path) {
        Ok(text) => parse_rain_csv(&text),
        Err(e) => {
            warn!(
                "Rainfall file {} unavailable ({e}); using {} dry hours",
                path.display(),
                DEFAULT_SERIES_HOURS
            );
            vec![0.0; DEFAULT_SERIES_HOURS]
        }
    }
}

/// Parse `timestamp,rain_mm` records after a header row.
///
/// Records without exactly two fields are skipped; a value that does not parse
/// reads as 0.0 and negative values clamp to 0.0.
pub fn parse_rain_csv(text: &str) -> Vec<f64> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(|result| match result {
            Ok(record) if record.len() == 2 => Some(record),
            Ok(_) => None,
            Err(e) => {
                debug!("Skipping rainfall record: {e}");
                None
            }
        })
        .map(|record| {
            let value = record
                .get(1)
                .and_then(|raw| raw.parse::<f64>().ok())
                .unwrap_or(0.0);
            if value.is_finite() {
                value.max(0.0)
            } else {
                0.0
            }
        })
        .collect()
}
