//! The per-game state machine: `ACTIVE` until every hour is played (`done`)
//! or trust runs out (`game_over`), after which steps are no-ops.

mod error;
mod game;
#[cfg(test)]
mod tests;
mod types;

pub use error::SessionError;
pub use game::{GameSession, SessionRng, SessionState};
pub use types::{
    FailureReason, Observation, Reward, SessionReplay, StateSnapshot, StepEvent, StepResult,
    ZoneState,
};
