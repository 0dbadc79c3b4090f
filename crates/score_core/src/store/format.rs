//! On-disk match record: MessagePack, LZ4 with prepended size, SHA-256 trailer.

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::error::StoreError;
use crate::models::Match;

/// Record format version.
pub const RECORD_VERSION: u32 = 1;

const CHECKSUM_LEN: usize = 32;

/// Versioned envelope around a stored snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub version: u32,

    /// Write time (unix milliseconds)
    pub updated_at: u64,

    #[serde(rename = "match")]
    pub state: Match,
}

impl MatchRecord {
    pub fn new(state: Match) -> Self {
        Self { version: RECORD_VERSION, updated_at: current_timestamp(), state }
    }

    pub fn format_updated_at(&self) -> String {
        use time::format_description::well_known::Rfc3339;

        OffsetDateTime::from_unix_timestamp_nanos(self.updated_at as i128 * 1_000_000)
            .ok()
            .and_then(|ts| ts.format(&Rfc3339).ok())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

pub fn serialize_and_compress(record: &MatchRecord) -> Result<Vec<u8>, StoreError> {
    let msgpack = to_vec_named(record)?;
    let mut bytes = compress_prepend_size(&msgpack);

    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<MatchRecord, StoreError> {
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(StoreError::Corrupted);
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(StoreError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| StoreError::Decompression)?;
    let record: MatchRecord = from_slice(&msgpack)?;

    if record.version > RECORD_VERSION {
        return Err(StoreError::VersionMismatch { found: record.version, expected: RECORD_VERSION });
    }

    Ok(record)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::models::Settings;

    fn record() -> MatchRecord {
        // deuce-advantage and a finished set exercise the custom value encoding
        let m = play(&with_games(singles(Settings::default()), 5, 4), "AAAA");
        let m = play(&m, "AAABBBA");
        MatchRecord::new(m)
    }

    #[test]
    fn test_record_survives_encoding() {
        let original = record();
        let bytes = serialize_and_compress(&original).unwrap();
        let loaded = decompress_and_deserialize(&bytes).unwrap();
        assert_eq!(loaded, original);
        assert!(loaded.state.current_set().is_some_and(|s| s.current_game.team_a.is_advantage()));
    }

    #[test]
    fn test_format_updated_at() {
        let mut rec = record();
        rec.updated_at = 1_700_000_000_000;
        assert_eq!(rec.format_updated_at(), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_flipped_byte_fails_checksum() {
        let mut bytes = serialize_and_compress(&record()).unwrap();
        bytes[6] ^= 0xFF;
        assert!(matches!(decompress_and_deserialize(&bytes), Err(StoreError::ChecksumMismatch)));
    }

    #[test]
    fn test_truncated_data_is_corrupted() {
        assert!(matches!(decompress_and_deserialize(&[0u8; 12]), Err(StoreError::Corrupted)));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let mut newer = record();
        newer.version = RECORD_VERSION + 1;
        let bytes = serialize_and_compress(&newer).unwrap();
        assert!(matches!(
            decompress_and_deserialize(&bytes),
            Err(StoreError::VersionMismatch { found: 2, expected: 1 })
        ));
    }
}
