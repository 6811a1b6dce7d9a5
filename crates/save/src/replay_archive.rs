//! Replay archives: a session's full history, bitcode-encoded behind a
//! checksummed header.
//!
//! An archive is read-only once written. Loading one gives back the
//! [`SessionReplay`] for review; it never resumes the session.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use simulation::session::SessionReplay;

use crate::atomic_write::atomic_write;
use crate::file_header::{unwrap_header, wrap_with_header};
use crate::replay_error::ReplayError;

/// Encode `replay` into archive bytes (header + payload).
pub fn encode_replay(replay: &SessionReplay) -> Result<Vec<u8>, ReplayError> {
    let payload = bitcode::encode(replay);
    if u32::try_from(payload.len()).is_err() {
        return Err(ReplayError::Encode(format!(
            "payload of {} bytes does not fit the archive header",
            payload.len()
        )));
    }
    Ok(wrap_with_header(&payload))
}

/// Validate the header of `bytes` and decode the replay it carries.
pub fn decode_replay(bytes: &[u8]) -> Result<SessionReplay, ReplayError> {
    let (_, payload) = unwrap_header(bytes)?;
    Ok(bitcode::decode(payload)?)
}

/// Write `replay` to `path` atomically. Returns the number of bytes written.
pub fn write_replay(path: &Path, replay: &SessionReplay) -> Result<usize, ReplayError> {
    let bytes = encode_replay(replay)?;
    atomic_write(path, &bytes)?;
    info!(
        "Replay archive written: {} ({} hours, {} bytes)",
        path.display(),
        replay.history.len(),
        bytes.len()
    );
    Ok(bytes.len())
}

pub fn read_replay(path: &Path) -> Result<SessionReplay, ReplayError> {
    let bytes = fs::read(path)?;
    decode_replay(&bytes)
}
