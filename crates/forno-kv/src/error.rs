//! Storage error types.

use thiserror::Error;

/// Errors that can occur when reading or writing snapshots.
#[derive(Error, Debug)]
pub enum KvError {
    /// Failed to open or prepare the backing store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Backend read/write failure.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::StoreError(e.to_string())
    }
}
