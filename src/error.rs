//! Top-level error types for the release command.
//!
//! Stage failures come through as [`crate::release::Error`]; this layer adds
//! the argument and environment problems detected before any stage runs.

use thiserror::Error;

/// Result type alias for the command line entry point
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for a release run
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("{0}")]
    Cli(#[from] CliError),

    /// IO errors (terminal output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline errors
    #[error("{0}")]
    Release(#[from] crate::release::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// A default could not be derived from the environment
    #[error("Cannot determine {what}: {hint}")]
    MissingDefault {
        /// What was being resolved
        what: String,
        /// How to provide it explicitly
        hint: String,
    },
}
