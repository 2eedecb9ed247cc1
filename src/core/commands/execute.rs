//! Command handlers.
//!
//! Each handler resolves its path arguments, checks preconditions and
//! returns a [`CommandResult`]. Side effects on disk happen here; side
//! effects on the session are left to the dispatcher.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use tracing::{error, info, warn};

use super::{CommandContext, CommandResult, ParsedArguments};
use crate::config::DEFAULT_PAGE;
use crate::core::filesystem::{IoClass, classify};
use crate::core::inspect;
use crate::core::operations::{OperationOutcome, copy_file_name, copy_tree, delete_tree};
use crate::core::path::ResolvedPath;
use crate::models::Notification;
use crate::utils::{format_drive_info, format_entry_info};

const CANNOT_NAVIGATE: &str = "Cannot navigate to that path. Specify an absolute path.";
const CANNOT_USE_PATH: &str = "Cannot use that path. Specify an absolute path.";
const DIRECTORY_NOT_FOUND: &str = "The directory does not exist.";
const ENTRY_NOT_FOUND: &str = "The file or directory does not exist.";
const DESTINATION_NOT_FOUND: &str =
    "The destination folder does not exist, or the path points to a file.";

fn error_result(text: impl Into<String>) -> CommandResult {
    CommandResult::notify(Notification::error(text))
}

fn warning_result(text: impl Into<String>) -> CommandResult {
    CommandResult::notify(Notification::warning(text))
}

fn info_result(text: impl Into<String>) -> CommandResult {
    CommandResult::notify(Notification::info(text))
}

// =============================================================================
// gotd
// =============================================================================

/// `gotd "<path>" [-p <page>]`
pub(super) fn go_to_directory(args: &ParsedArguments, ctx: &mut CommandContext<'_>) -> CommandResult {
    let Some(dir) = ctx.resolve(args.required(0)) else {
        return error_result(CANNOT_NAVIGATE);
    };
    if dir.is_empty() || !ctx.fs.is_dir(dir.as_path()) {
        return error_result(DIRECTORY_NOT_FOUND);
    }

    let page = match args.optional(0).map(str::parse::<usize>) {
        None | Some(Ok(0)) => DEFAULT_PAGE,
        Some(Ok(page)) => page,
        Some(Err(_)) => return warning_result("The page number is too large."),
    };

    info!(dir = %dir, page, "go to directory");
    CommandResult::navigate(dir, page)
}

// =============================================================================
// cpy
// =============================================================================

/// `cpy "<source>" "<destination dir>" [-rf true|false]`
pub(super) fn copy(args: &ParsedArguments, ctx: &mut CommandContext<'_>) -> CommandResult {
    let (Some(source), Some(dest_dir)) = (ctx.resolve(args.required(0)), ctx.resolve(args.required(1)))
    else {
        return error_result(CANNOT_USE_PATH);
    };
    if source.is_empty() || !ctx.fs.exists(source.as_path()) {
        return error_result(ENTRY_NOT_FOUND);
    }
    if dest_dir.is_empty() || !ctx.fs.is_dir(dest_dir.as_path()) {
        return error_result(DESTINATION_NOT_FOUND);
    }
    let Some(name) = source.file_name() else {
        return error_result("A root directory cannot be copied.");
    };

    let replace = args.optional(0).map(|value| value == "true");
    let target = dest_dir.join(name);

    if ctx.fs.is_dir(source.as_path()) {
        copy_directory(ctx, &source, &dest_dir, &target, replace == Some(true))
    } else {
        copy_single_file(ctx, &source, &dest_dir, &target, replace)
    }
}

fn copy_single_file(
    ctx: &mut CommandContext<'_>,
    source: &ResolvedPath,
    dest_dir: &ResolvedPath,
    target: &ResolvedPath,
    replace: Option<bool>,
) -> CommandResult {
    let name = source.file_name().unwrap_or_default();
    let exists = ctx.fs.exists(target.as_path());

    let destination = match replace {
        None if exists => {
            return info_result(format!(
                "The destination folder already has a file named {name}.\n\
                 To replace it, repeat the command with the replace argument set to true:\n\
                 cpy \"{source}\" \"{dest_dir}\" -rf true\n\
                 To keep both files, repeat the command with the replace argument set to false:\n\
                 cpy \"{source}\" \"{dest_dir}\" -rf false"
            ));
        }
        Some(false) if exists => copy_file_name(ctx.fs, dest_dir.as_path(), name),
        _ => target.as_path().to_path_buf(),
    };

    if replace == Some(true) && target.is_within(source) {
        return error_result("A file cannot be replaced by itself.");
    }

    match ctx.fs.copy_file(source.as_path(), &destination, replace == Some(true)) {
        Ok(()) => {
            info!(from = %source, to = %destination.display(), "file copied");
            info_result(format!("Copied to {}", destination.display()))
        }
        Err(err) => single_item_failure("copy the file", source.as_path(), &err),
    }
}

fn copy_directory(
    ctx: &mut CommandContext<'_>,
    source: &ResolvedPath,
    dest_dir: &ResolvedPath,
    target: &ResolvedPath,
    replace: bool,
) -> CommandResult {
    // `target` equal to `source` would copy every file onto itself
    if target.is_within(source)
        || dest_dir.is_within(source)
        || is_inside(target.as_path(), source.as_path())
        || is_inside(dest_dir.as_path(), source.as_path())
    {
        return error_result("A folder cannot be copied into itself.");
    }

    if !ctx.fs.is_dir(target.as_path()) {
        if let Err(err) = ctx.fs.create_dir(target.as_path()) {
            return single_item_failure("create the folder", target.as_path(), &err);
        }
    }

    match copy_tree(ctx.fs, &mut *ctx.prompt, source.as_path(), target.as_path(), replace) {
        Ok(OperationOutcome::Completed) => {
            info!(from = %source, to = %target, "folder copied");
            info_result(format!("Folder copied to {}", target))
        }
        Ok(OperationOutcome::Aborted) => {
            warn!(from = %source, "folder copy aborted");
            warning_result("Copy aborted. Items copied before the abort were kept.")
        }
        Err(err) => {
            error!(error = %err, "folder copy failed");
            error_result(format!(
                "An error occurred while copying the folder: {}",
                err.message()
            ))
        }
    }
}

/// `inner` lies inside `outer` once symlinks are resolved.
fn is_inside(inner: &Path, outer: &Path) -> bool {
    match (fs::canonicalize(inner), fs::canonicalize(outer)) {
        (Ok(inner), Ok(outer)) => inner.starts_with(outer),
        _ => false,
    }
}

// =============================================================================
// del
// =============================================================================

/// `del "<path>" [-r true]`
pub(super) fn delete(args: &ParsedArguments, ctx: &mut CommandContext<'_>) -> CommandResult {
    let Some(path) = ctx.resolve(args.required(0)) else {
        return error_result(CANNOT_USE_PATH);
    };
    if path.is_empty() || !ctx.fs.exists(path.as_path()) {
        return error_result(ENTRY_NOT_FOUND);
    }

    // A link is removed itself, never walked into
    if ctx.fs.is_symlink(path.as_path()) || !ctx.fs.is_dir(path.as_path()) {
        let result = match ctx.fs.remove_file(path.as_path()) {
            Ok(()) => {
                info!(path = %path, "file deleted");
                info_result(format!("Deleted {}", path))
            }
            Err(err) => single_item_failure("delete the file", path.as_path(), &err),
        };
        return leave_deleted_directory(ctx, &path, result);
    }

    if path.parent().is_none() {
        return error_result("A root directory cannot be deleted.");
    }
    let recursive = args.optional(0).is_some();

    let listing = match ctx.fs.list_dir(path.as_path()) {
        Ok(listing) => listing,
        Err(err) => return single_item_failure("delete the folder", path.as_path(), &err),
    };
    if !listing.is_empty() && !recursive {
        return info_result(format!(
            "The folder is not empty. To delete it with all its contents, \
             repeat the command with the recursive argument:\n\
             del \"{path}\" -r true"
        ));
    }

    let result = if listing.is_empty() {
        remove_root(ctx, &path)
    } else {
        match delete_tree(ctx.fs, &mut *ctx.prompt, path.as_path()) {
            Ok(OperationOutcome::Completed) => remove_root(ctx, &path),
            Ok(OperationOutcome::Aborted) => {
                warn!(path = %path, "folder deletion aborted");
                warning_result("Deletion aborted. Items deleted before the abort stay deleted.")
            }
            Err(err) => {
                error!(error = %err, "folder deletion failed");
                error_result(format!(
                    "An error occurred while deleting the folder: {}",
                    err.message()
                ))
            }
        }
    };

    leave_deleted_directory(ctx, &path, result)
}

fn remove_root(ctx: &mut CommandContext<'_>, path: &ResolvedPath) -> CommandResult {
    match ctx.fs.remove_dir(path.as_path()) {
        Ok(()) => {
            info!(path = %path, "folder deleted");
            info_result(format!("Deleted {}", path))
        }
        Err(err) if err.kind() == ErrorKind::DirectoryNotEmpty => {
            warn!(path = %path, "folder kept, skipped items remain");
            warning_result("Some items were skipped, so the folder itself was kept.")
        }
        Err(err) => single_item_failure("delete the folder", path.as_path(), &err),
    }
}

/// Move out of a current directory that no longer exists, to the closest
/// surviving ancestor.
fn leave_deleted_directory(
    ctx: &CommandContext<'_>,
    deleted: &ResolvedPath,
    result: CommandResult,
) -> CommandResult {
    let Some(current) = ctx.current_dir else {
        return result;
    };
    if !current.is_within(deleted) || ctx.fs.is_dir(current.as_path()) {
        return result;
    }

    let mut dir = current.parent();
    while let Some(candidate) = dir {
        if ctx.fs.is_dir(candidate.as_path()) {
            return result.and_navigate(candidate, DEFAULT_PAGE);
        }
        dir = candidate.parent();
    }
    result
}

// =============================================================================
// info
// =============================================================================

/// `info "<path>"`
pub(super) fn info(args: &ParsedArguments, ctx: &mut CommandContext<'_>) -> CommandResult {
    let Some(path) = ctx.resolve(args.required(0)) else {
        return error_result(CANNOT_USE_PATH);
    };
    if path.is_empty() || !ctx.fs.exists(path.as_path()) {
        return error_result(ENTRY_NOT_FOUND);
    }

    let details = if path.parent().is_none() {
        inspect::inspect_drive(&path).map(|drive| format_drive_info(&drive))
    } else {
        inspect::inspect(&path).map(|details| format_entry_info(&details))
    };

    match details {
        Ok(text) => info_result(text),
        Err(err) => {
            error!(path = %path, error = %err, "cannot read entry details");
            error_result(format!(
                "An error occurred while reading information about {}: {}",
                path, err
            ))
        }
    }
}

// =============================================================================
// exit
// =============================================================================

/// `exit`
pub(super) fn exit(_args: &ParsedArguments, _ctx: &mut CommandContext<'_>) -> CommandResult {
    info!("exit requested");
    CommandResult::exit()
}

// =============================================================================
// Helpers
// =============================================================================

/// Report a failed single-item operation. Conflicts and access problems are
/// expected; anything else is logged as an error.
fn single_item_failure(action: &str, path: &Path, err: &io::Error) -> CommandResult {
    match classify(err) {
        IoClass::Conflict => {
            warn!(path = %path.display(), error = %err, "cannot {}", action);
            error_result(format!(
                "Cannot {action}: it is in use by another program or has disappeared. ({err})"
            ))
        }
        IoClass::Access => {
            warn!(path = %path.display(), error = %err, "cannot {}", action);
            error_result(format!("Cannot {action}: access denied. ({err})"))
        }
        IoClass::Other => {
            error!(path = %path.display(), error = %err, "cannot {}", action);
            error_result(format!("An error occurred while trying to {action}: {err}"))
        }
    }
}
