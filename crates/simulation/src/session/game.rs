//! One game: zone storages, budget and trust advancing one hour per action.

use std::collections::BTreeMap;
use std::sync::Arc;

use bevy::prelude::*;

use super::error::SessionError;
use super::types::{
    FailureReason, Observation, Reward, SessionReplay, StateSnapshot, StepEvent, StepResult,
    ZoneState,
};
use crate::advisory::{recommend, RolloutParams};
use crate::config::{
    ALL_ZONES_COST_MULTIPLIER, CRITICAL_FLOOD_TRUST_PENALTY, DEBT_TRUST_PENALTY, GRANT_BASE,
    GRANT_INTERVAL_HOURS, GRANT_TRUST_BONUS, INITIAL_TRUST,
};
use crate::engine_view::EngineView;
use crate::forecast::{forecast_risk, round_to};
use crate::localization::capitalize;
use crate::risk::{flood_risk, is_critical, is_flooded};
use crate::scenario::{ActionId, ActionKind, ScenarioSpec, ZoneId, NOOP_ACTION_ID};
use crate::settings::AdvisorySettings;
use crate::sim_rng::RandomSource;
use crate::surrogate::TransitionModel;

/// Boxed random source owned by a session.
pub type SessionRng = Box<dyn RandomSource + Send + Sync>;

/// Mutable state of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub storages: BTreeMap<ZoneId, f64>,
    /// May go negative.
    pub budget: f64,
    /// Unclamped; the snapshot clamps it at 0 for display.
    pub trust: f64,
    /// Tracked per action but not enforced.
    pub cooldowns: BTreeMap<ActionId, u32>,
    /// Hours played.
    pub t: usize,
    pub total_reward: f64,
    pub game_over: bool,
    pub failure_reason: Option<FailureReason>,
    pub history: Vec<StepResult>,
}

impl SessionState {
    fn new(scenario: &ScenarioSpec) -> Self {
        let config = &scenario.config;
        Self {
            storages: config.zones.keys().map(|id| (id.clone(), 0.0)).collect(),
            budget: config.initial_budget,
            trust: INITIAL_TRUST,
            cooldowns: config.actions.iter().map(|a| (a.id.clone(), 0)).collect(),
            t: 0,
            total_reward: 0.0,
            game_over: false,
            failure_reason: None,
            history: Vec::new(),
        }
    }
}

/// A running game. Owns its state and its random source exclusively.
pub struct GameSession {
    scenario: Arc<ScenarioSpec>,
    model: TransitionModel,
    settings: AdvisorySettings,
    state: SessionState,
    rng: SessionRng,
}

impl GameSession {
    /// Start a game and record the initial (hour 0) result, which is also
    /// returned.
    pub fn start(
        scenario: Arc<ScenarioSpec>,
        model: TransitionModel,
        settings: AdvisorySettings,
        rng: SessionRng,
    ) -> (Self, StepResult) {
        let state = SessionState::new(&scenario);
        let mut session = Self {
            scenario,
            model,
            settings,
            state,
            rng,
        };
        info!(
            "Session initialized: scenario={}, hours={}",
            session.scenario.id,
            session.scenario.config.hours()
        );
        let initial = session.build_result(
            NOOP_ACTION_ID.to_string(),
            None,
            Reward::default(),
            Vec::new(),
        );
        session.state.history.push(initial.clone());
        (session, initial)
    }

    pub fn scenario(&self) -> &Arc<ScenarioSpec> {
        &self.scenario
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[StepResult] {
        &self.state.history
    }

    pub fn last_result(&self) -> Option<&StepResult> {
        self.state.history.last()
    }

    /// Game over, or every hour of the scenario played.
    pub fn is_terminal(&self) -> bool {
        self.state.game_over || self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.state.t >= self.scenario.config.hours()
    }

    pub fn replay(&self) -> SessionReplay {
        SessionReplay {
            scenario_id: self.scenario.id.clone(),
            history: self.state.history.clone(),
        }
    }

    /// Play one hour.
    ///
    /// Once the session is terminal this returns the last recorded result
    /// unchanged, whatever the arguments. Otherwise an unknown action or zone
    /// is rejected before anything is mutated: a zone id that names no zone
    /// is an error, never a charged step with no effect.
    pub fn step(
        &mut self,
        action_id: &str,
        zone_id: Option<&str>,
    ) -> Result<StepResult, SessionError> {
        debug!("Step start: t={}", self.state.t);

        if self.is_terminal() {
            if let Some(last) = self.last_result() {
                info!("Session already closed at t={}", self.state.t);
                return Ok(last.clone());
            }
        }

        let scenario = Arc::clone(&self.scenario);
        let config = &scenario.config;
        let kind = config
            .action(action_id)
            .map(|a| a.kind)
            .ok_or_else(|| SessionError::UnknownAction(action_id.to_string()))?;
        if let Some(zone) = zone_id {
            if !config.zones.contains_key(zone) {
                return Err(SessionError::UnknownZone(zone.to_string()));
            }
        }

        let final_cost = match kind {
            ActionKind::Mitigation { cost, .. } if zone_id.is_none() => {
                cost * ALL_ZONES_COST_MULTIPLIER
            }
            _ => kind.nominal_cost(),
        };

        let mut events = Vec::new();
        let state = &mut self.state;

        match kind {
            ActionKind::Funding { budget_gain, .. } => {
                state.budget += budget_gain;
                state.trust -= final_cost;
                events.push(StepEvent::EmergencyFunding {
                    budget_gain,
                    trust_penalty: final_cost,
                });
            }
            ActionKind::Noop | ActionKind::Mitigation { .. } => {
                if state.budget < final_cost {
                    state.trust -= DEBT_TRUST_PENALTY;
                }
                state.budget -= final_cost;
            }
        }

        let rain = config.rain_at(state.t);
        let effect = kind.storage_effect();
        let mut damage = 0.0;
        for (id, params) in &config.zones {
            let targeted = zone_id.map_or(true, |z| z == id.as_str());
            let applied = if targeted { effect } else { 0.0 };

            let storage = state.storages.entry(id.clone()).or_insert(0.0);
            *storage = self.model.predict_next_storage(*storage, rain, applied, params);
            let risk = flood_risk(*storage, params.threshold);
            damage += risk * params.damage_scale;

            if is_critical(risk) {
                state.trust -= CRITICAL_FLOOD_TRUST_PENALTY;
                events.push(StepEvent::CriticalFlooding { zone: id.clone() });
            }
        }

        let delta = -damage - final_cost;
        state.total_reward += delta;
        state.t += 1;

        if state.t % GRANT_INTERVAL_HOURS == 0 {
            let amount = GRANT_BASE + GRANT_TRUST_BONUS * (state.trust / 100.0);
            state.budget += amount;
            events.push(StepEvent::CouncilGrant {
                amount,
                trust: state.trust,
            });
        }

        if state.trust <= 0.0 {
            state.game_over = true;
            state.failure_reason = Some(FailureReason::PublicOutrage);
            events.push(StepEvent::CommanderRemoved);
            warn!("Commander removed at t={} (trust {:.1})", state.t, state.trust);
        }

        let reward = Reward {
            delta,
            total: state.total_reward,
            damage,
            cost: final_cost,
        };
        let result = self.build_result(
            action_id.to_string(),
            zone_id.map(str::to_string),
            reward,
            dedup_events(events),
        );
        self.state.history.push(result.clone());
        info!(
            "Step end: t={}, done={}",
            self.state.t, result.state.done
        );
        Ok(result)
    }

    /// Player-facing snapshot of the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        let zones = self
            .scenario
            .config
            .zones
            .iter()
            .map(|(id, params)| {
                let storage = self.state.storages.get(id).copied().unwrap_or(0.0);
                let risk = flood_risk(storage, params.threshold);
                let zone = ZoneState {
                    id: id.clone(),
                    name: capitalize(id),
                    storage,
                    risk,
                    flooded: is_flooded(risk),
                };
                (id.clone(), zone)
            })
            .collect();

        StateSnapshot {
            zones,
            budget: self.state.budget,
            trust: round_to(self.state.trust.max(0.0), 1),
            cooldowns: self.state.cooldowns.clone(),
            done: self.is_done(),
            game_over: self.state.game_over,
            failure_reason: self.state.failure_reason,
        }
    }

    pub fn observation(&self) -> Observation {
        Observation::at_hour(&self.scenario.config.rainfall, self.state.t)
    }

    fn build_result(
        &mut self,
        action: ActionId,
        zone_id: Option<ZoneId>,
        reward: Reward,
        events: Vec<StepEvent>,
    ) -> StepResult {
        let view = EngineView {
            config: &self.scenario.config,
            model: &self.model,
            storages: &self.state.storages,
            hour: self.state.t,
            budget: self.state.budget,
            trust: self.state.trust,
        };
        let forecast = forecast_risk(
            &view,
            self.settings.forecast_horizon,
            self.settings.forecast_samples,
            self.rng.as_mut(),
        );
        let recommendation = recommend(
            &view,
            RolloutParams::from(&self.settings),
            self.rng.as_mut(),
        );

        StepResult {
            action,
            zone_id,
            t: self.state.t as u32,
            obs: self.observation(),
            state: self.snapshot(),
            forecast,
            recommendation,
            reward,
            events,
        }
    }
}

/// Drop repeated events, keeping the first occurrence of each.
fn dedup_events(events: Vec<StepEvent>) -> Vec<StepEvent> {
    let mut unique: Vec<StepEvent> = Vec::with_capacity(events.len());
    for event in events {
        if !unique.contains(&event) {
            unique.push(event);
        }
    }
    unique
}
