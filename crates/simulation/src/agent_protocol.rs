//! Agent text protocol types for the `--agent` headless mode.
//!
//! Defines the JSON command/response envelope that external programs (LLMs,
//! scripts, test harnesses, a game client) use to drive flood sessions over
//! newline-delimited JSON on stdin/stdout.
//!
//! These types live in the `simulation` crate so they can be unit-tested
//! without pulling in the full app binary. The actual I/O loop lives in
//! `crates/app/src/agent_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::directory::GameId;
use crate::localization::DEFAULT_LOCALE;
use crate::scenario::ScenarioListing;
use crate::session::{SessionReplay, StateSnapshot, StepResult};
use crate::session_requests::{SessionOutcome, SessionRequest};
use crate::summary::GameSummary;

// ---------------------------------------------------------------------------
// Commands (stdin → simulation)
// ---------------------------------------------------------------------------

/// A single command sent by the external agent over stdin.
///
/// Each line of stdin is parsed as one `AgentCommand`. The `cmd` field acts as
/// the discriminator tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AgentCommand {
    /// List every scenario in the catalog.
    ListScenarios,

    /// Re-read the scenario directory.
    ReloadScenarios,

    /// Start a new game.
    Start {
        scenario_id: String,
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Play one hour of a game.
    Step {
        game_id: GameId,
        action: String,
        #[serde(default)]
        zone_id: Option<String>,
    },

    /// Current state of a game without stepping it.
    State { game_id: GameId },

    /// Full history of a game.
    Replay { game_id: GameId },

    /// End-of-game scorecard.
    Summary {
        game_id: GameId,
        #[serde(default)]
        locale: Option<String>,
    },

    /// Write a game's history to a replay archive.
    SaveReplay { game_id: GameId, path: String },

    /// Read a replay archive back. Does not resume the game.
    LoadReplay { path: String },

    /// Gracefully shut down the agent session.
    Quit,
}

impl AgentCommand {
    /// The engine request this command maps to, or `None` for commands the
    /// transport handles itself (replay files and quit).
    pub fn to_request(&self) -> Option<SessionRequest> {
        let request = match self {
            AgentCommand::ListScenarios => SessionRequest::ListScenarios,
            AgentCommand::ReloadScenarios => SessionRequest::ReloadScenarios,
            AgentCommand::Start { scenario_id, seed } => SessionRequest::Start {
                scenario_id: scenario_id.clone(),
                seed: *seed,
            },
            AgentCommand::Step {
                game_id,
                action,
                zone_id,
            } => SessionRequest::Step {
                game_id: *game_id,
                action: action.clone(),
                zone_id: zone_id.clone(),
            },
            AgentCommand::State { game_id } => SessionRequest::State { game_id: *game_id },
            AgentCommand::Replay { game_id } => SessionRequest::Replay { game_id: *game_id },
            AgentCommand::Summary { game_id, locale } => SessionRequest::Summary {
                game_id: *game_id,
                locale: locale.clone().unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            },
            AgentCommand::SaveReplay { .. } | AgentCommand::LoadReplay { .. } => return None,
            AgentCommand::Quit => return None,
        };
        Some(request)
    }
}

// ---------------------------------------------------------------------------
// Responses (simulation → stdout)
// ---------------------------------------------------------------------------

/// Every response includes the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    /// Monotonically increasing protocol version (currently 1).
    pub protocol_version: u32,
    /// The response payload, flattened into this object.
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

/// Tagged payload variants for agent responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    /// The engine is ready to accept commands.
    Ready,

    Scenarios { scenarios: Vec<ScenarioListing> },

    /// A game was created; `result` is its hour-0 snapshot.
    Started {
        game_id: GameId,
        scenario: ScenarioListing,
        result: StepResult,
    },

    StepResult { result: StepResult },

    State { t: u32, state: StateSnapshot },

    Replay { replay: SessionReplay },

    Summary { summary: GameSummary },

    /// Generic success acknowledgement (reload, save_replay).
    Ok,

    /// Invalid input or a failed operation. The session loop continues.
    Error { message: String },

    /// The session is ending (response to `quit`).
    Goodbye,
}

impl From<SessionOutcome> for ResponsePayload {
    fn from(outcome: SessionOutcome) -> Self {
        match outcome {
            SessionOutcome::Scenarios(scenarios) => ResponsePayload::Scenarios { scenarios },
            SessionOutcome::Reloaded { .. } => ResponsePayload::Ok,
            SessionOutcome::Started(started) => ResponsePayload::Started {
                game_id: started.game_id,
                scenario: started.scenario,
                result: started.initial,
            },
            SessionOutcome::Stepped(result) => ResponsePayload::StepResult { result },
            SessionOutcome::State(status) => ResponsePayload::State {
                t: status.t,
                state: status.state,
            },
            SessionOutcome::Replay(replay) => ResponsePayload::Replay { replay },
            SessionOutcome::Summary(summary) => ResponsePayload::Summary { summary },
            SessionOutcome::Error(message) => ResponsePayload::Error { message },
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current protocol version. Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Convenience constructor that wraps a payload with the current protocol version.
pub fn make_response(payload: ResponsePayload) -> AgentResponse {
    AgentResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
