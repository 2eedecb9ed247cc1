use std::path::{Path, PathBuf};

use tracing::debug;

use super::prompt::{REPLACE_SKIP_ABORT, ask};
use super::{ConflictDecision, ConflictPrompt, OperationOutcome, Step, list_or_ask, retry_or_ask};
use crate::core::error::FileOpError;
use crate::core::filesystem::{FsOps, IoClass, classify};

const COPY_MARKER: &str = " - copy (";

/// Copy the contents of directory `from` into directory `to`.
///
/// Existing destination files are overwritten when `replace_by_default` is
/// set, otherwise the user decides per file. Destination subdirectories are
/// created as they are reached.
pub fn copy_tree(
    fs: &dyn FsOps,
    prompt: &mut dyn ConflictPrompt,
    from: &Path,
    to: &Path,
    replace_by_default: bool,
) -> Result<OperationOutcome, FileOpError> {
    let mut stack = vec![(from.to_path_buf(), to.to_path_buf())];

    while let Some((src_dir, dst_dir)) = stack.pop() {
        debug!(from = %src_dir.display(), to = %dst_dir.display(), "copying directory");

        let listing = match list_or_ask(fs, prompt, &src_dir)? {
            Ok(listing) => listing,
            Err(Step::Aborted) => return Ok(OperationOutcome::Aborted),
            Err(_) => continue,
        };

        if !fs.is_dir(&dst_dir) {
            fs.create_dir(&dst_dir)
                .map_err(|e| FileOpError::io(&dst_dir, e))?;
        }

        for file in &listing.files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let target = dst_dir.join(name);

            let mut overwrite = replace_by_default;
            if !overwrite && fs.exists(&target) {
                let message = format!(
                    "The destination already has a file named \"{}\"",
                    name.to_string_lossy()
                );
                match ask(prompt, "Replace or skip file", &message, REPLACE_SKIP_ABORT) {
                    ConflictDecision::Replace => overwrite = true,
                    ConflictDecision::Skip => continue,
                    _ => return Ok(OperationOutcome::Aborted),
                }
            }

            let step = retry_or_ask(prompt, file, "File is in use", is_copy_conflict, || {
                fs.copy_file(file, &target, overwrite)
            })?;
            if step == Step::Aborted {
                return Ok(OperationOutcome::Aborted);
            }
        }

        // Reversed so the first subdirectory is copied first
        for dir in listing.dirs.iter().rev() {
            if let Some(name) = dir.file_name() {
                stack.push((dir.clone(), dst_dir.join(name)));
            }
        }
    }

    Ok(OperationOutcome::Completed)
}

fn is_copy_conflict(err: &std::io::Error) -> bool {
    classify(err) == IoClass::Conflict
}

/// A free name for a copy of `file_name` inside `dir`: `<stem> - copy (n)<ext>`.
///
/// A name that already carries a copy suffix continues its numbering, so
/// copying `a - copy (1).txt` yields `a - copy (2).txt`.
pub fn copy_file_name(fs: &dyn FsOps, dir: &Path, file_name: &str) -> PathBuf {
    let (stem, extension) = split_extension(file_name);
    let (base, mut number) = match strip_copy_suffix(stem) {
        Some((base, n)) => (base, n.saturating_add(1)),
        None => (stem, 1),
    };

    loop {
        let candidate = dir.join(format!("{base}{COPY_MARKER}{number}){extension}"));
        if !fs.exists(&candidate) {
            return candidate;
        }
        number = number.saturating_add(1);
    }
}

/// Split `name.ext` into `("name", ".ext")`. Dotfiles have no extension.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, ""),
        Some(i) => file_name.split_at(i),
    }
}

fn strip_copy_suffix(stem: &str) -> Option<(&str, u32)> {
    let inner = stem.strip_suffix(')')?;
    let (base, digits) = inner.rsplit_once(COPY_MARKER)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((base, digits.parse().ok()?))
}
