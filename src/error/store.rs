//! Link store error module.
//!
//! Errors raised by implementations of the link store, whether backed by
//! memory, a snapshot file or an external database.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during link store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists with the given id.
    #[error("Record {0} not found")]
    RecordNotFound(i64),

    /// No record carries the given short code.
    #[error("No record with short code '{0}'")]
    CodeNotFound(String),

    /// Another record already owns the short code.
    #[error("Short code '{0}' is already assigned")]
    DuplicateCode(String),

    /// Reading or writing a snapshot failed.
    #[error("Snapshot I/O failed for {path}: {source}")]
    SnapshotIo {
        /// The snapshot location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("Snapshot format error: {0}")]
    SnapshotFormat(#[from] serde_json::Error),

    /// The backing store is not reachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for link store operations.
pub type StoreResult<T> = Result<T, StoreError>;
