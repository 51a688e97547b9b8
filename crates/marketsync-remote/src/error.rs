//! Error types for remote archive access.

use thiserror::Error;

/// Errors raised by a transport implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request kept failing transiently and ran out of retries.
    #[error("Request timed out after {0} attempts")]
    Timeout(u32),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// Response payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised by the remote storage provider.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The underlying transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
