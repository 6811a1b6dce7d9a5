//! Process-wide table of running games.
//!
//! Each session sits behind its own `Mutex`, so sessions never share mutable
//! state and can be stepped independently through a shared reference.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::scenario::{ScenarioCatalog, ScenarioListing};
use crate::session::{
    GameSession, SessionError, SessionReplay, StateSnapshot, StepResult,
};
use crate::settings::AdvisorySettings;
use crate::sim_rng::SimRng;
use crate::summary::GameSummary;
use crate::surrogate::TransitionModel;

/// Opaque game identifier.
pub type GameId = Uuid;

/// Returned by [`SessionDirectory::start`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartedGame {
    pub game_id: GameId,
    pub scenario: ScenarioListing,
    pub initial: StepResult,
}

/// Current state of a game without stepping it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub t: u32,
    pub state: StateSnapshot,
}

#[derive(Resource, Default)]
pub struct SessionDirectory {
    sessions: HashMap<GameId, Mutex<GameSession>>,
}

impl SessionDirectory {
    /// Create a session from `scenario_id` and record its initial result.
    pub fn start(
        &mut self,
        catalog: &ScenarioCatalog,
        model: &TransitionModel,
        settings: &AdvisorySettings,
        scenario_id: &str,
        seed: u64,
    ) -> Result<StartedGame, SessionError> {
        let scenario = catalog
            .get(scenario_id)
            .map_err(|_| SessionError::UnknownScenario(scenario_id.to_string()))?;
        let listing = ScenarioListing::from(scenario.as_ref());

        let (session, initial) = GameSession::start(
            scenario,
            model.clone(),
            *settings,
            Box::new(SimRng::from_seed_u64(seed)),
        );

        let game_id = Uuid::new_v4();
        self.sessions.insert(game_id, Mutex::new(session));
        info!("Game {game_id} started: scenario={scenario_id}, seed={seed}");

        Ok(StartedGame {
            game_id,
            scenario: listing,
            initial,
        })
    }

    /// Play one hour of `game_id`.
    pub fn step(
        &self,
        game_id: GameId,
        action: &str,
        zone_id: Option<&str>,
    ) -> Result<StepResult, SessionError> {
        self.lock(game_id)?.step(action, zone_id)
    }

    pub fn status(&self, game_id: GameId) -> Result<SessionStatus, SessionError> {
        let session = self.lock(game_id)?;
        Ok(SessionStatus {
            t: session.state().t as u32,
            state: session.snapshot(),
        })
    }

    pub fn replay(&self, game_id: GameId) -> Result<SessionReplay, SessionError> {
        Ok(self.lock(game_id)?.replay())
    }

    pub fn summary(&self, game_id: GameId, locale: &str) -> Result<GameSummary, SessionError> {
        let session = self.lock(game_id)?;
        Ok(GameSummary::from_history(session.history(), locale))
    }

    pub fn contains(&self, game_id: GameId) -> bool {
        self.sessions.contains_key(&game_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// A poisoned lock is recovered: the step body only mutates state after
    /// all validation has passed and cannot fail half-way.
    fn lock(&self, game_id: GameId) -> Result<MutexGuard<'_, GameSession>, SessionError> {
        let session = self
            .sessions
            .get(&game_id)
            .ok_or_else(|| SessionError::UnknownSession(game_id.to_string()))?;
        Ok(session.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
