//! Error types for the cleaning utility.
//!
//! Every failure the loader, pipeline or exporter can produce is one of the
//! [`CleanerError`] variants. The variant tells the caller *where* the run
//! failed; the message carries the underlying reason.
//!
//! ```
//! use datascrub::error::CleanerError;
//!
//! fn describe(err: &CleanerError) -> &'static str {
//!     match err {
//!         CleanerError::FileNotFound(_) => "missing input",
//!         CleanerError::UnsupportedFormat(_) => "bad format",
//!         _ => "other failure",
//!     }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any result whose error converts into a
//! [`CleanerError`]. Unlike `anyhow`, the error keeps its kind; only the
//! message is prefixed:
//!
//! ```no_run
//! use datascrub::error::ResultExt as _;
//!
//! fn read_raw(path: &str) -> datascrub::error::Result<String> {
//!     std::fs::read_to_string(path).context("Failed to read input")
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for cleaning runs.
#[derive(Debug)]
pub enum CleanerError {
    /// Input path does not exist
    FileNotFound(PathBuf),

    /// Unrecognized input extension or output format token
    UnsupportedFormat(String),

    /// Parser-level failure while decoding the input file
    LoadFailure(String),

    /// Unexpected failure inside a pipeline stage
    CleaningFailure(String),

    /// Failure writing the output file
    ExportFailure(String),

    /// Invalid or unreadable configuration
    Config(String),

    /// I/O errors not attributed to a specific stage
    Io(std::io::Error),
}

impl fmt::Display for CleanerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::UnsupportedFormat(msg) => write!(f, "Unsupported format: {msg}"),
            Self::LoadFailure(msg) => write!(f, "Failed to load data: {msg}"),
            Self::CleaningFailure(msg) => write!(f, "Cleaning failed: {msg}"),
            Self::ExportFailure(msg) => write!(f, "Export failed: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CleanerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl CleanerError {
    /// Returns the same kind of error with `prefix` prepended to its message.
    #[must_use]
    pub fn with_prefix(self, prefix: &str) -> Self {
        match self {
            Self::FileNotFound(path) => Self::FileNotFound(path),
            Self::UnsupportedFormat(msg) => Self::UnsupportedFormat(format!("{prefix}: {msg}")),
            Self::LoadFailure(msg) => Self::LoadFailure(format!("{prefix}: {msg}")),
            Self::CleaningFailure(msg) => Self::CleaningFailure(format!("{prefix}: {msg}")),
            Self::ExportFailure(msg) => Self::ExportFailure(format!("{prefix}: {msg}")),
            Self::Config(msg) => Self::Config(format!("{prefix}: {msg}")),
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), format!("{prefix}: {e}"))),
        }
    }
}

impl From<std::io::Error> for CleanerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CleanerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

// Polars errors surface inside pipeline stages unless the loader or exporter
// maps them explicitly.
impl From<polars::error::PolarsError> for CleanerError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::CleaningFailure(err.to_string())
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error, keeping its kind.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CleanerError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_prefix(&msg.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_prefix(&f()))
    }
}
