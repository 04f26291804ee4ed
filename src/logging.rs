//! Logging configuration using tracing
//!
//! The terminal belongs to the UI, so log output goes to a file. Filtering
//! follows the RUST_LOG environment variable.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when RUST_LOG is unset
const DEFAULT_FILTER: &str = "info";

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file or its directory could not be created
    #[error("Failed to open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    Subscriber(String),
}

/// Default log file location
///
/// Uses `~/.cache/storeview/storeview.log` on Linux, or the equivalent
/// platform cache directory. Returns `None` without a home directory.
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "storeview")?;
    Some(project_dirs.cache_dir().join("storeview.log"))
}

/// Opens (appending) the log file, creating its directory if needed
fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let io_err = |source| LoggingError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)
}

/// Initialize the tracing subscriber writing to `path`
///
/// # Example RUST_LOG values
/// - `RUST_LOG=debug` - Show cache hits, joins and discarded responses
/// - `RUST_LOG=storeview=trace,reqwest=info` - Different levels per crate
///
/// # Errors
/// Returns an error if the file cannot be opened or a subscriber is already
/// installed.
pub fn init(path: &Path) -> Result<(), LoggingError> {
    let file = open_log_file(path)?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
