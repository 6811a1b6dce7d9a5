// ---------------------------------------------------------------------------
// file_header – Replay archive header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (16 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "FLDR" (0x464C4452)
//   [4..8]   Format version (u32)
//   [8..12]  Payload size (u32)
//   [12..16] xxHash32 checksum of the payload (everything after the header)
//
// On write: encode SessionReplay -> prepend header (with checksum of payload)
// On read: check magic -> check version -> check size -> validate checksum

use xxhash_rust::xxh32::xxh32;

use crate::replay_error::ReplayError;

/// Magic bytes identifying a flood replay archive.
pub const MAGIC: [u8; 4] = *b"FLDR";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Current archive format version.
pub const FORMAT_VERSION: u32 = 1;

/// Seed for xxHash32 checksum.
const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub payload_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    /// Create a new header for the given payload.
    pub fn new(payload: &[u8]) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            payload_size: payload.len() as u32,
            checksum: xxh32(payload, XXHASH_SEED),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&MAGIC);
        out[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        out[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        out[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }
}

/// Returns bytes: [header (16 bytes)] ++ [payload].
pub fn wrap_with_header(payload: &[u8]) -> Vec<u8> {
    let header = FileHeader::new(payload);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);
    out
}

/// Parse and validate the header, returning it with the payload it covers.
pub fn unwrap_header(bytes: &[u8]) -> Result<(FileHeader, &[u8]), ReplayError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ReplayError::Corrupt(format!(
            "archive is too short ({} bytes, need at least {HEADER_SIZE} for header)",
            bytes.len()
        )));
    }
    if bytes[..4] != MAGIC {
        return Err(ReplayError::Corrupt(
            "missing FLDR magic bytes; not a replay archive".to_string(),
        ));
    }

    let format_version = read_u32(bytes, 4);
    let payload_size = read_u32(bytes, 8);
    let checksum = read_u32(bytes, 12);

    if format_version > FORMAT_VERSION {
        return Err(ReplayError::VersionMismatch {
            expected_max: FORMAT_VERSION,
            found: format_version,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != payload_size as usize {
        return Err(ReplayError::Corrupt(format!(
            "payload is {} bytes, header says {payload_size}",
            payload.len()
        )));
    }

    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(ReplayError::Corrupt(format!(
            "checksum mismatch (expected {checksum:#010X}, got {computed:#010X})"
        )));
    }

    Ok((
        FileHeader {
            format_version,
            payload_size,
            checksum,
        },
        payload,
    ))
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_and_unwrap() {
        let data = b"hourly history";
        let wrapped = wrap_with_header(data);

        assert_eq!(&wrapped[..4], b"FLDR");
        assert_eq!(wrapped.len(), HEADER_SIZE + data.len());

        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.format_version, FORMAT_VERSION);
        assert_eq!(header.payload_size, data.len() as u32);
        assert_eq!(payload, data);
    }

    #[test]
    fn test_header_layout_is_little_endian() {
        let header = FileHeader {
            format_version: 1,
            payload_size: 0x0102_0304,
            checksum: 0xAABB_CCDD,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[12..16], &[0xDD, 0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut wrapped = wrap_with_header(b"payload");
        wrapped[0] = b'M';
        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(matches!(err, ReplayError::Corrupt(_)));
        assert!(err.to_string().contains("magic"), "got: {err}");
    }

    #[test]
    fn test_corrupted_checksum_detected() {
        let mut wrapped = wrap_with_header(b"test payload");
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;

        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"), "got: {err}");
    }

    #[test]
    fn test_future_version_rejected() {
        let mut wrapped = wrap_with_header(b"test payload");
        wrapped[4..8].copy_from_slice(&999u32.to_le_bytes());

        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::VersionMismatch {
                expected_max: FORMAT_VERSION,
                found: 999
            }
        ));
    }

    #[test]
    fn test_truncated_archive_detected() {
        let err = unwrap_header(b"FLDR\x01\x00").unwrap_err();
        assert!(err.to_string().contains("too short"), "got: {err}");

        let mut wrapped = wrap_with_header(b"twelve bytes");
        wrapped.truncate(wrapped.len() - 2);
        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(err.to_string().contains("header says 12"), "got: {err}");
    }

    #[test]
    fn test_empty_payload() {
        let wrapped = wrap_with_header(b"");
        assert_eq!(wrapped.len(), HEADER_SIZE);
        let (header, payload) = unwrap_header(&wrapped).unwrap();
        assert_eq!(header.payload_size, 0);
        assert!(payload.is_empty());
    }
}
