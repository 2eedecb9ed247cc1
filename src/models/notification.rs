//! Notification types for the info window.

use std::fmt;

/// Severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NotificationKind {
    /// Plain message or entry details
    #[default]
    Info,
    /// Recoverable user mistake or partial result
    Warning,
    /// Failed command
    Error,
}

/// The message shown under the directory listing after a command.
///
/// An empty `Info` notification means there is nothing to show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn info(s: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            text: s.into(),
        }
    }

    pub fn warning(s: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            text: s.into(),
        }
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: s.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Notification {
    /// Warnings and errors are wrapped in `!` markers so they stand out
    /// without relying on terminal colors.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NotificationKind::Info => write!(f, "{}", self.text),
            NotificationKind::Warning => write!(f, "! {} !", self.text),
            NotificationKind::Error => write!(f, "!!! {} !!!", self.text),
        }
    }
}
