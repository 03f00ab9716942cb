//! Progress persistence errors.

use thiserror::Error;

/// Progress persistence error types.
///
/// These never escape [`crate::ProgressStore::load`] or
/// [`crate::ProgressStore::save`]; they are logged and recovered locally.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Stored entry could not be read.
    #[error("Storage read error: {0}")]
    StorageRead(String),

    /// Entry could not be written.
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// Entry exceeds the backend quota.
    #[error("Storage quota exceeded: {size} bytes over a {quota} byte quota")]
    QuotaExceeded { size: usize, quota: usize },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Payload parsed but violates the record invariants.
    #[error("Invalid progress record: {0}")]
    InvalidRecord(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown backend name in configuration.
    #[error("Unknown storage backend: {0}")]
    UnknownBackend(String),
}
