//! Error types for release operations.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as DeriveError;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, transforming or publishing a release.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error.
    #[error("Error {context} {}: {error}", path.display())]
    Fs {
        /// Context of the error.
        context: &'static str,
        /// Path that was accessed.
        path: PathBuf,
        /// Underlying error.
        error: io::Error,
    },

    /// A subprocess could not be spawned.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command line that was attempted.
        command: String,
        /// Underlying error.
        error: io::Error,
    },

    /// A subprocess ran but exited unsuccessfully.
    #[error("Cannot execute {command} (exit code: {code})")]
    CommandStatus {
        /// Full command line.
        command: String,
        /// Exit code, or a description when terminated by a signal.
        code: String,
    },

    /// A required external tool is not on `PATH`.
    #[error("`{tool}` not found in PATH: {reason}")]
    MissingTool {
        /// Tool name.
        tool: &'static str,
        /// Lookup failure.
        reason: String,
    },

    /// A required environment variable is not set.
    #[error("{message}")]
    MissingEnv {
        /// Variable name.
        variable: &'static str,
        /// Message shown to the user.
        message: String,
    },

    /// The registry answered with a non-success status.
    #[error("Upload rejected by registry ({status}): {body}")]
    UploadRejected {
        /// HTTP status.
        status: reqwest::StatusCode,
        /// Response body.
        body: String,
    },

    /// Signing an artifact failed.
    #[error("Failed to sign {}: {reason}", path.display())]
    Signing {
        /// Artifact being signed.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Directory traversal error.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Archive error.
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// HTTP error.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("{0}")]
    Url(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    GenericError(String),
}

/// Extension trait for attaching context to errors and options.
pub trait Context<T> {
    /// Adds context to the error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Adds lazily evaluated context to the error.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for attaching a path to I/O errors.
pub trait ErrorExt<T> {
    /// Converts the error into [`Error::Fs`] with the given context and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Returns early with [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::release::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::release::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
