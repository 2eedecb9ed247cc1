//! Session state and its persistence between runs.
//!
//! The state file holds two lines: the current directory and the page.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::DEFAULT_PAGE;
use crate::core::commands::CommandResult;
use crate::core::error::SessionError;
use crate::core::path::{PathStyle, ResolvedPath};
use crate::models::Notification;

/// Shown when the saved session cannot be used.
pub const RESTORE_FAILED: &str = "Could not restore the previous session. Showing the root folder.";

/// Shown when not even a root folder is available.
pub const NO_ROOT: &str = "Could not load any folder: no root directory is available.";

// =============================================================================
// Session State
// =============================================================================

/// Where the user is and what they were last told.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    current_dir: Option<ResolvedPath>,
    page: usize,
    notification: Notification,
}

impl SessionState {
    pub fn new(current_dir: Option<ResolvedPath>, page: usize) -> Self {
        Self {
            current_dir,
            page: page.max(1),
            notification: Notification::empty(),
        }
    }

    pub fn current_dir(&self) -> Option<&ResolvedPath> {
        self.current_dir.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn set_notification(&mut self, notification: Notification) {
        self.notification = notification;
    }

    /// Show the first page again (e.g., when the requested page is empty).
    pub fn reset_page(&mut self) {
        self.page = DEFAULT_PAGE;
    }

    /// Apply a command result in one step. Returns `true` when the session
    /// should end.
    pub fn apply(&mut self, result: CommandResult) -> bool {
        if let Some(nav) = result.navigate_to {
            debug!(dir = %nav.dir, page = nav.page, "navigating");
            self.current_dir = Some(nav.dir);
            self.page = nav.page.max(1);
        }
        self.notification = result.notification;
        result.exit
    }
}

// =============================================================================
// Persistence
// =============================================================================

/// Reads and writes the session file.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session, checking that its directory is still usable.
    pub fn load(&self, style: PathStyle) -> Result<SessionState, SessionError> {
        let text = fs::read_to_string(&self.path).map_err(|source| SessionError::Read {
            path: self.path.clone(),
            source,
        })?;
        let mut lines = text.lines();

        let dir_line = lines.next().map(str::trim).unwrap_or_default();
        if dir_line.is_empty() {
            return Err(SessionError::NothingSaved);
        }
        let dir = ResolvedPath::parse(dir_line, style)
            .filter(|dir| !dir.is_empty())
            .ok_or_else(|| SessionError::NotAbsolute(dir_line.to_string()))?;

        check_directory(dir.as_path()).map_err(|source| SessionError::Inaccessible {
            path: dir.as_path().to_path_buf(),
            source,
        })?;

        let page = lines
            .next()
            .and_then(|line| line.trim().parse::<usize>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(DEFAULT_PAGE);

        Ok(SessionState::new(Some(dir), page))
    }

    /// Load the saved session, or start at the root of the working
    /// directory with a warning.
    pub fn restore(&self) -> SessionState {
        match self.load(PathStyle::native()) {
            Ok(state) => {
                info!(dir = ?state.current_dir().map(|d| d.to_string()), "restored session");
                state
            }
            Err(err) => {
                warn!(error = %err, "cannot restore session");
                fallback_state()
            }
        }
    }

    pub fn save(&self, state: &SessionState) -> Result<(), SessionError> {
        let write_err = |source| SessionError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let dir = state.current_dir().map(|d| d.as_str()).unwrap_or_default();
        fs::write(&self.path, format!("{}\n{}\n", dir, state.page())).map_err(write_err)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}

/// The session used when nothing could be restored.
pub fn fallback_state() -> SessionState {
    match fallback_dir() {
        Some(root) => {
            let mut state = SessionState::new(Some(root), DEFAULT_PAGE);
            state.set_notification(Notification::warning(RESTORE_FAILED));
            state
        }
        None => {
            let mut state = SessionState::new(None, DEFAULT_PAGE);
            state.set_notification(Notification::error(NO_ROOT));
            state
        }
    }
}

/// Root of the working directory (its drive on Windows, `/` elsewhere).
pub fn fallback_dir() -> Option<ResolvedPath> {
    let cwd = std::env::current_dir().ok()?;
    let root = ResolvedPath::from_native(&cwd)?.root()?;
    check_directory(root.as_path()).ok()?;
    Some(root)
}

/// The directory exists, is a directory and can be listed.
fn check_directory(dir: &Path) -> io::Result<()> {
    if !fs::metadata(dir)?.is_dir() {
        return Err(io::Error::other("not a directory"));
    }
    fs::read_dir(dir).map(|_| ())
}
