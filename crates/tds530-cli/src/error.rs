//! CLI-specific error types and exit codes.

use tds530_core::{PathError, SettingsError};
use tds530_runtime::AcquireError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Anything without a more specific category.
    #[error("{0}")]
    General(String),

    /// Argument error not caught by the parser.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (recording file, .env file, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The instrument could not be reached or did not answer.
    #[error("Instrument unavailable: {0}")]
    InstrumentUnavailable(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// - 1: General error
    /// - 2: Invalid arguments
    /// - 64-78: see sysexits.h
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::General(_) => 1,
            Self::Arguments(_) => 2,              // EX_USAGE
            Self::InstrumentUnavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,                    // EX_IOERR
            Self::Config(_) => 78,                // EX_CONFIG
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::EmptyPath => Self::Arguments(err.to_string()),
            PathError::DirectoryNotFound(_) => Self::Config(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<AcquireError> for CliError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Sink(_) => Self::Io(err.to_string()),
            AcquireError::Task(_) => Self::General(err.to_string()),
            _ => Self::InstrumentUnavailable(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(format!("{err:#}"))
    }
}
