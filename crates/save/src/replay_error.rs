// ---------------------------------------------------------------------------
// ReplayError: error type for replay archive reads and writes
// ---------------------------------------------------------------------------

use std::fmt;

#[derive(Debug)]
pub enum ReplayError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// Bitcode encoding failed.
    Encode(String),
    /// Bitcode decoding failed (header valid, payload not a replay).
    Decode(String),
    /// The header is missing, truncated, or its checksum does not match.
    Corrupt(String),
    /// Archive format version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Io(e) => write!(f, "I/O error: {e}"),
            ReplayError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            ReplayError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            ReplayError::Corrupt(msg) => write!(f, "Corrupt replay archive: {msg}"),
            ReplayError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: archive is v{found}, but this build only supports up to v{expected_max}"
            ),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        ReplayError::Io(e)
    }
}

impl From<bitcode::Error> for ReplayError {
    fn from(e: bitcode::Error) -> Self {
        ReplayError::Decode(e.to_string())
    }
}
