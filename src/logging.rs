//! Logging for a single cleaning run.
//!
//! Every run appends to one log file (row counts, stage notes, error traces)
//! and echoes warnings to stderr. Instead of a process-wide global, the
//! subscriber is installed as the thread default for as long as the returned
//! [`LogSession`] lives:
//!
//! ```no_run
//! use datascrub::logging;
//! use std::path::Path;
//!
//! let session = logging::init(Path::new("data_cleaning.log"))?;
//! tracing::info!("Starting data cleaning");
//! drop(session); // logging for this run ends here
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, filter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Keeps the run's subscriber installed until dropped.
pub struct LogSession {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl LogSession {
    /// File this session appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Opens (or creates) `log_file` in append mode and installs the subscriber.
///
/// The level defaults to INFO and can be overridden with `RUST_LOG`.
///
/// # Errors
///
/// Returns error if the log file cannot be opened or the filter is invalid.
pub fn init(log_file: &Path) -> Result<LogSession> {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Log path has no file name: {}", log_file.display()))?
        .to_string_lossy()
        .into_owned();

    // Rotation::NEVER keeps the exact file name and appends across runs
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(appender);

    // Errors reach the user through the CLI's own message, so only warnings echo here
    let stderr_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(filter::filter_fn(|meta| *meta.level() == Level::WARN));

    let guard = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .set_default();

    tracing::debug!("Logging to {}", log_file.display());

    Ok(LogSession {
        path: log_file.to_path_buf(),
        _guard: guard,
    })
}
