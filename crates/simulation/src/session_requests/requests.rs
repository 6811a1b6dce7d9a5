use serde::{Deserialize, Serialize};

use crate::directory::GameId;

/// An operation a transport asks the engine to perform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SessionRequest {
    ListScenarios,
    ReloadScenarios,
    Start {
        scenario_id: String,
        /// Drawn from the master `SimRng` when absent.
        seed: Option<u64>,
    },
    Step {
        game_id: GameId,
        action: String,
        zone_id: Option<String>,
    },
    State {
        game_id: GameId,
    },
    Replay {
        game_id: GameId,
    },
    Summary {
        game_id: GameId,
        locale: String,
    },
}
