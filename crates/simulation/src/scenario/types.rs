use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

pub type ZoneId = String;
pub type ActionId = String;

/// Action id of the no-op action.
pub const NOOP_ACTION_ID: &str = "none";

/// Action id of the budget-relief action.
pub const FUNDING_ACTION_ID: &str = "funding";

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// Physical coefficients of one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneParameters {
    /// Persistence: fraction of storage carried into the next hour.
    pub a: f64,
    /// Rain gain: storage added per unit of rainfall.
    pub b: f64,
    /// Mitigation strength: storage removed per unit of action effect.
    pub c: f64,
    /// Storage at which flood risk is 0.5.
    pub threshold: f64,
    /// Damage per hour at risk 1.0.
    pub damage_scale: f64,
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Raw `{cost, effect}` pair as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub cost: f64,
    pub effect: f64,
}

/// What an action does, resolved once when the scenario is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Do nothing; free.
    Noop,
    /// Reduce storage by `effect` (scaled by zone `c`) for `cost` budget.
    Mitigation { cost: f64, effect: f64 },
    /// Gain `budget_gain` budget at the price of `trust_cost` trust.
    Funding { trust_cost: f64, budget_gain: f64 },
}

impl ActionKind {
    /// Classify a raw definition by its id.
    pub fn resolve(id: &str, def: ActionDefinition) -> Self {
        match id {
            NOOP_ACTION_ID => ActionKind::Noop,
            FUNDING_ACTION_ID => ActionKind::Funding {
                trust_cost: def.cost,
                budget_gain: def.effect,
            },
            _ => ActionKind::Mitigation {
                cost: def.cost,
                effect: def.effect,
            },
        }
    }

    /// The configured cost before any all-zones scaling.
    ///
    /// For funding this is the trust penalty, not a budget amount.
    pub fn nominal_cost(&self) -> f64 {
        match *self {
            ActionKind::Noop => 0.0,
            ActionKind::Mitigation { cost, .. } => cost,
            ActionKind::Funding { trust_cost, .. } => trust_cost,
        }
    }

    /// Storage-reducing effect of a mitigation, as seen by rollouts.
    pub fn mitigation_effect(&self) -> f64 {
        match *self {
            ActionKind::Mitigation { effect, .. } => effect,
            ActionKind::Noop | ActionKind::Funding { .. } => 0.0,
        }
    }

    /// Storage reduction applied to targeted zones during a live step.
    ///
    /// Funding reuses its budget gain here, so an untargeted funding call
    /// also drains every zone.
    pub fn storage_effect(&self) -> f64 {
        match *self {
            ActionKind::Mitigation { effect, .. } => effect,
            ActionKind::Funding { budget_gain, .. } => budget_gain,
            ActionKind::Noop => 0.0,
        }
    }

    /// Amount of budget this action consumes at nominal scale.
    pub fn budget_cost(&self) -> f64 {
        match *self {
            ActionKind::Mitigation { cost, .. } => cost,
            ActionKind::Noop | ActionKind::Funding { .. } => 0.0,
        }
    }

    pub fn is_mitigation(&self) -> bool {
        matches!(self, ActionKind::Mitigation { .. })
    }
}

/// An action available in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAction {
    pub id: ActionId,
    #[serde(flatten)]
    pub kind: ActionKind,
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Display text that is either a single string or a per-locale map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl DisplayText {
    /// Text for `locale`, falling back to English and then to any entry.
    pub fn get(&self, locale: &str) -> &str {
        match self {
            DisplayText::Plain(s) => s,
            DisplayText::Localized(map) => map
                .get(locale)
                .or_else(|| map.get("en"))
                .or_else(|| map.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

/// Everything the simulation needs to run one scenario. Read-only for the
/// lifetime of every session started from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub initial_budget: f64,
    /// Zones in ascending id order.
    pub zones: BTreeMap<ZoneId, ZoneParameters>,
    /// Actions in ascending id order.
    pub actions: Vec<ScenarioAction>,
    /// Rainfall (mm) for each hour of the game; its length is the hour count.
    pub rainfall: Vec<f64>,
}

impl ScenarioConfig {
    /// Build a config, resolving raw action definitions and ordering them by id.
    pub fn new(
        initial_budget: f64,
        zones: BTreeMap<ZoneId, ZoneParameters>,
        actions: BTreeMap<ActionId, ActionDefinition>,
        rainfall: Vec<f64>,
    ) -> Self {
        let actions = actions
            .into_iter()
            .map(|(id, def)| {
                let kind = ActionKind::resolve(&id, def);
                ScenarioAction { id, kind }
            })
            .collect();
        Self {
            initial_budget,
            zones,
            actions,
            rainfall,
        }
    }

    pub fn action(&self, id: &str) -> Option<&ScenarioAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Number of playable hours.
    pub fn hours(&self) -> usize {
        self.rainfall.len()
    }

    /// Rainfall at `hour`, clamped to the last known value. 0.0 for an empty series.
    pub fn rain_at(&self, hour: usize) -> f64 {
        match self.rainfall.len() {
            0 => 0.0,
            len => self.rainfall[hour.min(len - 1)],
        }
    }
}

/// A named, described scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub id: String,
    pub name: DisplayText,
    pub description: DisplayText,
    pub time_step_hr: u32,
    pub config: ScenarioConfig,
}

/// Short listing entry for clients choosing a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioListing {
    pub id: String,
    pub name: DisplayText,
    pub description: DisplayText,
    pub time_step_hr: u32,
    pub duration_steps: usize,
    pub initial_budget: f64,
    pub zones: BTreeMap<ZoneId, ZoneParameters>,
    pub actions: Vec<ScenarioAction>,
}

impl From<&ScenarioSpec> for ScenarioListing {
    fn from(spec: &ScenarioSpec) -> Self {
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            time_step_hr: spec.time_step_hr,
            duration_steps: spec.config.hours(),
            initial_budget: spec.config.initial_budget,
            zones: spec.config.zones.clone(),
            actions: spec.config.actions.clone(),
        }
    }
}
