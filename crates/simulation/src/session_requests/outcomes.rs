use serde::Serialize;

use crate::directory::{SessionStatus, StartedGame};
use crate::scenario::ScenarioListing;
use crate::session::{SessionReplay, StepResult};
use crate::summary::GameSummary;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum SessionOutcome {
    Scenarios(Vec<ScenarioListing>),
    Reloaded { count: usize },
    Started(StartedGame),
    Stepped(StepResult),
    State(SessionStatus),
    Replay(SessionReplay),
    Summary(GameSummary),
    /// Invalid input or a failed reload; the message is client-facing.
    Error(String),
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SessionOutcome::Error(_))
    }

    /// Extract the error message if present.
    pub fn error(&self) -> Option<&str> {
        match self {
            SessionOutcome::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
