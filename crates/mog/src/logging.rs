#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! The editor owns the terminal, so logs never go to stdout or stderr. They
//! are written to the file named by `MOG_LOG_FILE`, filtered by `MOG_LOG`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::cli::{DEFAULT_LOG_FILTER, Opts};
use crate::error::Error;

/// Install the global subscriber if `opts` names a log file.
///
/// Returns whether logging was enabled. An unparseable filter falls back to
/// [`DEFAULT_LOG_FILTER`] and is reported in the log itself.
///
/// # Errors
///
/// Returns [`Error::Logging`] if the file cannot be opened for appending or
/// a global subscriber is already installed.
pub fn init(opts: &Opts) -> Result<bool, Error> {
    let Some(path) = opts.log_file.as_deref() else {
        return Ok(false);
    };

    let (filter, bad_filter) = match EnvFilter::try_new(&opts.log_filter) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(e)),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| logging_error(path, source))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| logging_error(path, std::io::Error::other(e)))?;

    if let Some(e) = bad_filter {
        tracing::warn!(filter = %opts.log_filter, error = %e, "invalid MOG_LOG, using default");
    }
    tracing::info!(version = crate::cli::VERSION, "logging started");
    Ok(true)
}

fn logging_error(path: &Path, source: std::io::Error) -> Error {
    Error::Logging {
        path: path.to_path_buf(),
        source,
    }
}
