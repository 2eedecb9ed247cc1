//! The conflict decision protocol between the bulk operations and the user.

use std::fmt;

/// What to do about one conflicting item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictDecision {
    Replace,
    Skip,
    Abort,
    Retry,
}

impl ConflictDecision {
    /// Answer key shown in the console prompt.
    ///
    /// Replace and Retry share `r`; no option set offers both.
    pub fn key(self) -> char {
        match self {
            Self::Replace | Self::Retry => 'r',
            Self::Skip => 's',
            Self::Abort => 'a',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Skip => "skip",
            Self::Abort => "abort",
            Self::Retry => "retry",
        }
    }
}

impl fmt::Display for ConflictDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.key(), self.label())
    }
}

/// Offered when the destination file already exists.
pub const REPLACE_SKIP_ABORT: &[ConflictDecision] = &[
    ConflictDecision::Replace,
    ConflictDecision::Skip,
    ConflictDecision::Abort,
];

/// Offered when an item is locked, vanished or access was denied.
pub const RETRY_SKIP_ABORT: &[ConflictDecision] = &[
    ConflictDecision::Retry,
    ConflictDecision::Skip,
    ConflictDecision::Abort,
];

/// Offered when a directory cannot be listed.
pub const SKIP_ABORT: &[ConflictDecision] = &[ConflictDecision::Skip, ConflictDecision::Abort];

/// Asks the user how to resolve a conflict.
///
/// Implementations must return one of `options`.
pub trait ConflictPrompt {
    fn ask(&mut self, title: &str, message: &str, options: &[ConflictDecision]) -> ConflictDecision;
}

/// Ask, treating an answer outside the offered set as Abort.
pub(crate) fn ask(
    prompt: &mut dyn ConflictPrompt,
    title: &str,
    message: &str,
    options: &[ConflictDecision],
) -> ConflictDecision {
    let decision = prompt.ask(title, message, options);
    if options.contains(&decision) {
        decision
    } else {
        tracing::warn!(?decision, "prompt answered with an option it was not offered");
        ConflictDecision::Abort
    }
}
