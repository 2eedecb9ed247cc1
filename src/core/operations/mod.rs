//! Recursive copy and delete over a directory tree.
//!
//! Both operations walk the tree depth-first with an explicit work stack and
//! stop at the first Abort. Work finished before an abort stays on disk.
//!
//! Conflicts (existing destination, locked or vanished file, denied access)
//! are handed to a [`ConflictPrompt`]; only unexpected I/O failures surface
//! as [`FileOpError`].

mod copy;
mod delete;
pub mod prompt;

#[cfg(test)]
pub(crate) mod testing;

use std::io;
use std::path::Path;

use tracing::warn;

pub use copy::{copy_file_name, copy_tree};
pub use delete::delete_tree;
pub use prompt::{ConflictDecision, ConflictPrompt};

use crate::core::error::FileOpError;
use crate::core::filesystem::{DirListing, FsOps, IoClass, classify};
use prompt::{RETRY_SKIP_ABORT, SKIP_ABORT, ask};

/// How a bulk operation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Every item was processed or explicitly skipped
    Completed,
    /// The user chose Abort; not an error
    Aborted,
}

/// Result of handling one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Done,
    Skipped,
    Aborted,
}

/// List `dir`, asking Skip/Abort when it cannot be read.
///
/// `Ok(Err(step))` carries the user's choice (`Skipped` or `Aborted`).
fn list_or_ask(
    fs: &dyn FsOps,
    prompt: &mut dyn ConflictPrompt,
    dir: &Path,
) -> Result<Result<DirListing, Step>, FileOpError> {
    match fs.list_dir(dir) {
        Ok(listing) => Ok(Ok(listing)),
        Err(err) if classify(&err) == IoClass::Other => Err(FileOpError::io(dir, err)),
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "cannot list directory");
            let message = format!("Cannot open {}: {}", dir.display(), err);
            match ask(prompt, "Folder unavailable", &message, SKIP_ABORT) {
                ConflictDecision::Skip => Ok(Err(Step::Skipped)),
                _ => Ok(Err(Step::Aborted)),
            }
        }
    }
}

/// Run `attempt` until it succeeds, the user gives up, or it fails in a way
/// `is_conflict` does not cover.
fn retry_or_ask<F>(
    prompt: &mut dyn ConflictPrompt,
    path: &Path,
    title: &str,
    is_conflict: fn(&io::Error) -> bool,
    mut attempt: F,
) -> Result<Step, FileOpError>
where
    F: FnMut() -> io::Result<()>,
{
    loop {
        let err = match attempt() {
            Ok(()) => return Ok(Step::Done),
            Err(err) => err,
        };
        if !is_conflict(&err) {
            return Err(FileOpError::io(path, err));
        }
        warn!(path = %path.display(), error = %err, "{}", title);
        let message = format!(
            "{}: {}\nClose any program using it and try again.",
            path.display(),
            err
        );
        match ask(prompt, title, &message, RETRY_SKIP_ABORT) {
            ConflictDecision::Retry => continue,
            ConflictDecision::Skip => return Ok(Step::Skipped),
            _ => return Ok(Step::Aborted),
        }
    }
}
