//! Replay archives for flood sessions: checksummed, versioned, written
//! atomically.

mod atomic_write;
pub mod file_header;
pub mod replay_archive;
pub mod replay_error;

pub use atomic_write::atomic_write;
pub use replay_archive::{decode_replay, encode_replay, read_replay, write_replay};
pub use replay_error::ReplayError;
