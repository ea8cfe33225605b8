//! Error types for PROJGEN
//!
//! Every failure carries a structural [`ErrorKind`] so callers can decide on
//! policy (for example tolerating access denial) without inspecting messages.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for PROJGEN operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source template or source directory missing
    NotFound,
    /// Empty or malformed input
    InvalidInput,
    /// Destination project folder already exists
    AlreadyExists,
    /// Permission or access denial reported by the OS
    AccessDenied,
    /// Any other filesystem failure
    Io,
    /// Unreadable or unwritable settings file
    Config,
}

/// Main error type for PROJGEN
#[derive(Error, Debug)]
pub enum Error {
    /// Path that must exist does not
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Destination already present
    #[error("Target project folder already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Filesystem failure on a specific path
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// Path the operation was acting on
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Filesystem failure without path information
    #[error("IO error: {0}")]
    RawIo(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        /// Error context
        context: String,
        /// Source error
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error
    pub fn context<S: Into<String>>(self, context: S) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Wrap an OS error together with the path it concerns
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Structural classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::Io { source, .. } | Error::RawIo(source) => classify_io(source),
            Error::Config(_) => ErrorKind::Config,
            Error::WithContext { source, .. } => source.kind(),
        }
    }

    /// Check whether the OS refused access
    pub fn is_access_denied(&self) -> bool {
        self.kind() == ErrorKind::AccessDenied
    }
}

fn classify_io(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ErrorKind::AccessDenied,
        _ => ErrorKind::Io,
    }
}

/// Trait for adding context to results
pub trait ResultExt<T> {
    /// Add context to the error
    fn context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (only called on error)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.context(f()))
    }
}
