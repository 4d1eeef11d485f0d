//! Error types for talking to Concertim and for batch synchronization.

use thiserror::Error;

/// A failed call to the Concertim REST API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("concertim returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that abort a whole synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("inventory snapshot failed: {0}")]
    Client(#[from] ClientError),

    #[error("inconsistent inventory: {0}")]
    Snapshot(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
