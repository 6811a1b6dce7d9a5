//! Plugin that wires up the session-request subsystem: queue, executor, and log.

use bevy::prelude::*;

use super::executor::execute_session_requests;
use super::result_log::SessionResultLog;
use super::SessionRequestQueue;

/// Registers the request queue, result log, and executor system.
pub struct SessionRequestsPlugin;

impl Plugin for SessionRequestsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionRequestQueue>();
        app.init_resource::<SessionResultLog>();

        app.add_systems(Update, execute_session_requests);
    }
}
