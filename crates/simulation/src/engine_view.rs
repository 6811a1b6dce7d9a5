use std::collections::BTreeMap;

use crate::risk::flood_risk;
use crate::scenario::{ScenarioConfig, ZoneId, ZoneParameters};
use crate::surrogate::TransitionModel;

/// Read-only view of one session's current state.
///
/// The forecaster and the CVaR evaluator only ever see this view, so they
/// cannot mutate live session state.
#[derive(Debug, Clone, Copy)]
pub struct EngineView<'a> {
    pub config: &'a ScenarioConfig,
    pub model: &'a TransitionModel,
    pub storages: &'a BTreeMap<ZoneId, f64>,
    /// Hours already played; the next step uses rainfall at this index.
    pub hour: usize,
    pub budget: f64,
    pub trust: f64,
}

impl<'a> EngineView<'a> {
    /// Zones in id order with their current storage.
    pub fn zones(&self) -> impl Iterator<Item = (&'a ZoneId, &'a ZoneParameters, f64)> + 'a {
        let storages = self.storages;
        self.config
            .zones
            .iter()
            .map(move |(id, params)| (id, params, storages.get(id).copied().unwrap_or(0.0)))
    }

    /// One transition of a single zone: `(next_storage, risk)`.
    pub fn advance_zone(
        &self,
        storage: f64,
        rain: f64,
        effect: f64,
        params: &ZoneParameters,
    ) -> (f64, f64) {
        let next = self.model.predict_next_storage(storage, rain, effect, params);
        (next, flood_risk(next, params.threshold))
    }
}
