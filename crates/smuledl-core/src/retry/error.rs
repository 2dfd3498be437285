//! Transfer error type for retry classification.

use thiserror::Error;

/// Error returned by a single transfer attempt (curl failure, HTTP error, short body, disk).
/// Kept separate from anyhow so the retry loop can classify it first.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Server closed before `Content-Length` bytes arrived.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Disk write failed (e.g. disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
}
