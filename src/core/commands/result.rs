//! Command execution result type.

use crate::core::path::ResolvedPath;
use crate::models::Notification;

/// Directory and page to show next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub dir: ResolvedPath,
    pub page: usize,
}

/// Result of executing a command.
///
/// Handlers never touch the session directly; the dispatcher applies the
/// whole result at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Replaces the current notification
    pub notification: Notification,
    /// Optional directory to navigate to (e.g., for `gotd`)
    pub navigate_to: Option<Navigation>,
    /// End the session after this command
    pub exit: bool,
}

impl CommandResult {
    /// Create a result with just a notification.
    pub fn notify(notification: Notification) -> Self {
        Self {
            notification,
            ..Self::default()
        }
    }

    /// Create a result with navigation and no notification.
    pub fn navigate(dir: ResolvedPath, page: usize) -> Self {
        Self {
            navigate_to: Some(Navigation { dir, page }),
            ..Self::default()
        }
    }

    pub fn exit() -> Self {
        Self {
            exit: true,
            ..Self::default()
        }
    }

    /// Attach navigation to an existing result.
    pub fn and_navigate(mut self, dir: ResolvedPath, page: usize) -> Self {
        self.navigate_to = Some(Navigation { dir, page });
        self
    }
}
