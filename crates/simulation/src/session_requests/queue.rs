use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::SessionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestSource {
    Agent,
    Autoplay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequest {
    /// Sequence number used to look the outcome up in the result log.
    pub id: u64,
    pub source: RequestSource,
    pub request: SessionRequest,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SessionRequestQueue {
    next_id: u64,
    pending: Vec<QueuedRequest>,
}

impl SessionRequestQueue {
    /// Enqueue a request and return its sequence number.
    pub fn push(&mut self, source: RequestSource, request: SessionRequest) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(QueuedRequest {
            id,
            source,
            request,
        });
        id
    }

    pub fn drain(&mut self) -> Vec<QueuedRequest> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
