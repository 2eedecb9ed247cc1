use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ConflictPrompt, OperationOutcome, Step, list_or_ask, retry_or_ask};
use crate::core::error::FileOpError;
use crate::core::filesystem::{FsOps, IoClass, classify};

enum Visit {
    /// Delete the directory's files, then schedule its subdirectories
    Enter(PathBuf),
    /// All children handled; remove the now-empty directory
    Leave(PathBuf),
}

/// Delete everything inside `root`, leaving `root` itself in place.
///
/// The caller removes `root` once this returns `Completed`. Skipped items
/// keep their parent directories alive.
pub fn delete_tree(
    fs: &dyn FsOps,
    prompt: &mut dyn ConflictPrompt,
    root: &Path,
) -> Result<OperationOutcome, FileOpError> {
    let mut stack = vec![Visit::Enter(root.to_path_buf())];

    while let Some(visit) = stack.pop() {
        let step = match visit {
            Visit::Enter(dir) => {
                debug!(dir = %dir.display(), "deleting directory contents");
                let listing = match list_or_ask(fs, prompt, &dir)? {
                    Ok(listing) => listing,
                    Err(step) => {
                        if step == Step::Aborted {
                            return Ok(OperationOutcome::Aborted);
                        }
                        continue;
                    }
                };

                for file in &listing.files {
                    let step = retry_or_ask(prompt, file, "Cannot delete file", is_delete_conflict, || {
                        ignore_missing(fs.remove_file(file))
                    })?;
                    if step == Step::Aborted {
                        return Ok(OperationOutcome::Aborted);
                    }
                }

                if dir != root {
                    stack.push(Visit::Leave(dir));
                }
                // Reversed so the first subdirectory is deleted first
                for sub in listing.dirs.into_iter().rev() {
                    stack.push(Visit::Enter(sub));
                }
                Step::Done
            }
            Visit::Leave(dir) => {
                debug!(dir = %dir.display(), "removing directory");
                retry_or_ask(prompt, &dir, "Cannot delete folder", is_delete_conflict, || {
                    ignore_missing(fs.remove_dir(&dir))
                })?
            }
        };

        if step == Step::Aborted {
            return Ok(OperationOutcome::Aborted);
        }
    }

    Ok(OperationOutcome::Completed)
}

/// Locks, denied access and folders kept non-empty by skipped items can all
/// be fixed by the user and retried.
fn is_delete_conflict(err: &io::Error) -> bool {
    matches!(classify(err), IoClass::Conflict | IoClass::Access)
        || err.kind() == ErrorKind::DirectoryNotEmpty
}

/// Something else already deleted it.
fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::filesystem::LocalFs;
    use crate::core::operations::ConflictDecision;
    use crate::core::operations::prompt::RETRY_SKIP_ABORT;
    use crate::core::operations::testing::{FlakyFs, ScriptedPrompt, write_file};

    #[test]
    fn test_delete_everything_below_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        write_file(&root, "a.txt", "a");
        write_file(&root, "sub/b.txt", "b");
        write_file(&root, "sub/deep/c.txt", "c");
        fs::create_dir(root.join("empty")).unwrap();

        let mut prompt = ScriptedPrompt::default();
        let outcome = delete_tree(&LocalFs, &mut prompt, &root).unwrap();

        assert_eq!(outcome, OperationOutcome::Completed);
        assert!(root.is_dir());
        assert!(LocalFs.list_dir(&root).unwrap().is_empty());
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_abort_partway_keeps_the_rest() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        write_file(&root, "a.txt", "a");
        write_file(&root, "b.txt", "b");
        write_file(&root, "c.txt", "c");
        write_file(&root, "sub/d.txt", "d");

        let flaky = FlakyFs::new().fail("b.txt", ErrorKind::ResourceBusy, 1);
        let mut prompt = ScriptedPrompt::new([ConflictDecision::Abort]);
        let outcome = delete_tree(&flaky, &mut prompt, &root).unwrap();

        assert_eq!(outcome, OperationOutcome::Aborted);
        assert!(!root.join("a.txt").exists());
        assert!(root.join("b.txt").exists());
        assert!(root.join("c.txt").exists());
        assert!(root.join("sub/d.txt").exists());
        assert!(tmp.path().exists());
        assert_eq!(prompt.asked[0].options, RETRY_SKIP_ABORT);
    }

    #[test]
    fn test_retry_after_lock_released() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        write_file(&root, "locked.txt", "x");

        let flaky = FlakyFs::new().fail("locked.txt", ErrorKind::PermissionDenied, 1);
        let mut prompt = ScriptedPrompt::new([ConflictDecision::Retry]);
        let outcome = delete_tree(&flaky, &mut prompt, &root).unwrap();

        assert_eq!(outcome, OperationOutcome::Completed);
        assert!(!root.join("locked.txt").exists());
    }

    #[test]
    fn test_skipped_file_keeps_its_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        write_file(&root, "sub/keep.txt", "k");
        write_file(&root, "other/gone.txt", "g");

        let flaky = FlakyFs::new().fail("keep.txt", ErrorKind::ResourceBusy, 1);
        // Skip the file, then skip the folder it keeps non-empty
        let mut prompt = ScriptedPrompt::new([ConflictDecision::Skip, ConflictDecision::Skip]);
        let outcome = delete_tree(&flaky, &mut prompt, &root).unwrap();

        assert_eq!(outcome, OperationOutcome::Completed);
        assert!(root.join("sub/keep.txt").exists());
        assert!(!root.join("other").exists());
        assert_eq!(prompt.asked.len(), 2);
        assert_eq!(prompt.asked[1].title, "Cannot delete folder");
    }

    #[test]
    fn test_unexpected_error_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        write_file(&root, "bad.txt", "x");

        let flaky = FlakyFs::new().fail("bad.txt", ErrorKind::InvalidData, 1);
        let mut prompt = ScriptedPrompt::default();
        let result = delete_tree(&flaky, &mut prompt, &root);

        assert!(matches!(result, Err(FileOpError::Io { .. })));
    }
}
