use std::fmt;

/// Errors raised while loading or looking up scenarios.
#[derive(Debug)]
pub enum ScenarioError {
    /// I/O error reading the scenario file.
    Io(std::io::Error),
    /// `scenario_params.json` is not valid JSON for the expected layout.
    Parse(serde_json::Error),
    /// The file parsed but describes an unusable scenario.
    Invalid(String),
    /// No scenario with this id is loaded.
    UnknownScenario(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io(e) => write!(f, "I/O error: {e}"),
            ScenarioError::Parse(e) => write!(f, "Scenario parse error: {e}"),
            ScenarioError::Invalid(msg) => write!(f, "Invalid scenario: {msg}"),
            ScenarioError::UnknownScenario(id) => write!(f, "Scenario not found: {id}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io(e) => Some(e),
            ScenarioError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        ScenarioError::Parse(e)
    }
}
