//! Custom error types for the application.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each domain:
//!
//! - [`FileOpError`] - unexpected I/O failures that abort a whole command
//! - [`ConfigError`] - configuration file problems (defaults are used instead)
//! - [`SessionError`] - saved session problems (a root directory is used instead)
//!
//! User input mistakes and resolvable conflicts are not errors: the former
//! become notifications, the latter go through the conflict prompt.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// An I/O failure that is neither a conflict nor an access problem.
///
/// Aborts the running command; its message is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileOpError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The underlying OS message without the path prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Io { source, .. } => source.to_string(),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Session state persistence errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot read session file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write session file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session file holds no directory")]
    NothingSaved,
    #[error("saved directory {0} is not an absolute path")]
    NotAbsolute(String),
    #[error("saved directory {}: {source}", path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
