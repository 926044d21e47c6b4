#![forbid(unsafe_code)]

//! Top-level error type for the editor binary.

use std::fmt;
use std::io;
use std::path::PathBuf;

use mog_core::SessionError;

/// Anything that ends the editor with a non-zero exit status.
#[derive(Debug)]
pub enum Error {
    /// The log file could not be opened or the subscriber installed.
    Logging {
        /// Requested log file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Opening, saving or releasing the edited file failed.
    Session(SessionError),
    /// Reading input from or drawing to the terminal failed.
    Terminal(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logging { path, source } => {
                write!(f, "cannot log to {}: {source}", path.display())
            }
            Self::Session(e) => e.fmt(f),
            Self::Terminal(e) => write!(f, "terminal error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Logging { source, .. } => Some(source),
            Self::Session(e) => Some(e),
            Self::Terminal(e) => Some(e),
        }
    }
}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Terminal(e)
    }
}
