//! Acquisition error types.

use tds530_core::{ProtocolError, SinkError};
use thiserror::Error;

/// Errors raised while talking to the instrument or storing its samples.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The TCP connection could not be established.
    #[error("Failed to connect to {address}: {reason}")]
    Connect { address: String, reason: String },

    /// The TCP connection was not established in time.
    #[error("Timed out connecting to {address} after {timeout_ms} ms")]
    ConnectTimeout { address: String, timeout_ms: u128 },

    /// The instrument closed the connection.
    #[error("Connection closed by the instrument")]
    Disconnected,

    /// No complete reply arrived within the response timeout.
    #[error("No reply within {timeout_ms} ms")]
    ResponseTimeout { timeout_ms: u128 },

    /// The reply could not be framed or parsed, or the socket failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A sample could not be stored.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The acquisition task panicked or was aborted.
    #[error("Acquisition task failed: {0}")]
    Task(String),
}

impl AcquireError {
    /// Whether reconnecting may clear the error.
    ///
    /// Storage and task failures are not recoverable by talking to the
    /// instrument again.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Sink(_) | Self::Task(_))
    }
}
