use std::fmt;

/// Invalid input to a session operation. Nothing is mutated when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownScenario(String),
    UnknownSession(String),
    UnknownAction(String),
    UnknownZone(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownScenario(id) => write!(f, "Scenario not found: {id}"),
            SessionError::UnknownSession(id) => write!(f, "Game session not found: {id}"),
            SessionError::UnknownAction(id) => write!(f, "Unknown action: {id}"),
            SessionError::UnknownZone(id) => write!(f, "Unknown zone: {id}"),
        }
    }
}

impl std::error::Error for SessionError {}
