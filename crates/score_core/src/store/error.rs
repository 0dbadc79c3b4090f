use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Match payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Match not found: {id}")]
    NotFound { id: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Whether a second write attempt can reasonably succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::PayloadTooLarge { .. } => true, // retry with a slimmer snapshot
            StoreError::LockPoisoned => false,
            StoreError::ChecksumMismatch => false,
            StoreError::Corrupted => false,
            _ => false,
        }
    }
}
