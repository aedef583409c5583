//! Protocol error types.

use thiserror::Error;

/// Errors raised while framing or parsing instrument replies.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The reply did not contain a timestamp line followed by data.
    #[error("Malformed reply: expected at least 2 lines, got {found}")]
    TooFewLines { found: usize },

    /// The first line was not a `YYYY/MM/DD HH:MM:SS` timestamp.
    #[error("Malformed timestamp {line:?}: {reason}")]
    InvalidTimestamp { line: String, reason: String },

    /// The peer sent more data than a frame may hold without a terminator.
    #[error("Reply exceeds {max} bytes without a terminator")]
    FrameTooLarge { max: usize },

    /// Socket-level failure while reading or writing a frame.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
