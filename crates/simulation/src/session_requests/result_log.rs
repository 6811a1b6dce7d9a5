//! Ring-buffer log of recently executed session requests and their outcomes.
//!
//! Transports push a request, run one app update, then read the outcome back
//! by sequence number instead of reaching into the directory themselves.

use bevy::prelude::*;

use super::{QueuedRequest, SessionOutcome};

/// Maximum number of entries retained in the ring buffer.
const MAX_ENTRIES: usize = 64;

#[derive(Resource, Debug, Clone, Default)]
pub struct SessionResultLog {
    entries: Vec<(QueuedRequest, SessionOutcome)>,
}

impl SessionResultLog {
    /// Record a new request/outcome pair, evicting the oldest when full.
    pub fn push(&mut self, request: QueuedRequest, outcome: SessionOutcome) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push((request, outcome));
    }

    /// Return the last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[(QueuedRequest, SessionOutcome)] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Outcome of the request with sequence number `id`, if still retained.
    pub fn find(&self, id: u64) -> Option<&SessionOutcome> {
        self.entries
            .iter()
            .rev()
            .find(|(request, _)| request.id == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
