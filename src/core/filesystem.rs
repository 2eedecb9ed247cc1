//! Filesystem access used by command handlers and the bulk operations.
//!
//! Everything that mutates the disk goes through [`FsOps`], so tests can
//! wrap [`LocalFs`] and inject transient failures (a locked file that
//! becomes free on the next attempt) without real cross-process locking.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Immediate children of a directory, each group sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirListing {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

impl DirListing {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Filesystem primitives needed by the file manager.
pub trait FsOps {
    /// List a directory. Symlinks are reported as files and never followed.
    fn list_dir(&self, dir: &Path) -> io::Result<DirListing>;

    /// True if anything (file, directory, dangling link) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// True for a directory or a symlink to one.
    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` itself is a symlink, whatever it points to.
    fn is_symlink(&self, path: &Path) -> bool;

    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Copy file contents. Fails with `AlreadyExists` when the target exists
    /// and `overwrite` is false, and with `InvalidInput` when both paths name
    /// the same file. A symlink is recreated as a link, never followed.
    fn copy_file(&self, from: &Path, to: &Path, overwrite: bool) -> io::Result<()>;

    /// Remove a file or a symlink (the link itself, not its target).
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// The real local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl FsOps for LocalFs {
    fn list_dir(&self, dir: &Path) -> io::Result<DirListing> {
        let mut listing = DirListing::default();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                listing.dirs.push(entry.path());
            } else {
                listing.files.push(entry.path());
            }
        }
        listing.files.sort();
        listing.dirs.sort();
        Ok(listing)
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn copy_file(&self, from: &Path, to: &Path, overwrite: bool) -> io::Result<()> {
        if !overwrite && self.exists(to) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already exists", to.display()),
            ));
        }
        if fs::symlink_metadata(from)?.file_type().is_symlink() {
            if same_entry(from, to) {
                return Err(same_file_error(to));
            }
            return copy_link(from, to);
        }
        // Copying onto the source would truncate it before reading
        if same_file(from, to) {
            return Err(same_file_error(to));
        }
        fs::copy(from, to).map(|_| ())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        #[cfg(windows)]
        if path.is_symlink() && path.is_dir() {
            return fs::remove_dir(path);
        }
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}

fn same_file_error(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::InvalidInput,
        format!("{} is both the source and the destination", path.display()),
    )
}

/// Both paths reach the same file once every symlink is resolved.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Both paths name the same directory entry. The last component is not
/// resolved, so a link and its target are different entries.
fn same_entry(a: &Path, b: &Path) -> bool {
    let entry = |path: &Path| {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        Some(fs::canonicalize(parent).ok()?.join(path.file_name()?))
    };
    matches!((entry(a), entry(b)), (Some(a), Some(b)) if a == b)
}

/// Recreate the symlink `from` at `to`, replacing whatever file is there.
fn copy_link(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    if fs::symlink_metadata(to).is_ok() {
        fs::remove_file(to)?;
    }
    make_link(&target, from, to)
}

#[cfg(unix)]
fn make_link(target: &Path, _from: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, to)
}

#[cfg(windows)]
fn make_link(target: &Path, from: &Path, to: &Path) -> io::Result<()> {
    if from.is_dir() {
        std::os::windows::fs::symlink_dir(target, to)
    } else {
        std::os::windows::fs::symlink_file(target, to)
    }
}

// =============================================================================
// Error Classification
// =============================================================================

/// How an I/O failure is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoClass {
    /// Locked, busy or vanished: worth retrying once the user intervenes
    Conflict,
    /// Permission denied: retrying rarely helps
    Access,
    /// Anything else: abort the command
    Other,
}

/// Classify an I/O error.
pub fn classify(err: &io::Error) -> IoClass {
    if is_lock_violation(err) {
        return IoClass::Conflict;
    }
    match err.kind() {
        ErrorKind::ResourceBusy | ErrorKind::WouldBlock | ErrorKind::NotFound => IoClass::Conflict,
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => IoClass::Access,
        _ => IoClass::Other,
    }
}

/// `ERROR_SHARING_VIOLATION` / `ERROR_LOCK_VIOLATION`: another process holds
/// the file open.
#[cfg(windows)]
fn is_lock_violation(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[cfg(not(windows))]
fn is_lock_violation(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_dir_splits_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(tmp.path().join("zdir")).unwrap();
        fs::create_dir(tmp.path().join("adir")).unwrap();

        let listing = LocalFs.list_dir(tmp.path()).unwrap();
        assert_eq!(
            listing.files,
            vec![tmp.path().join("a.txt"), tmp.path().join("b.txt")]
        );
        assert_eq!(
            listing.dirs,
            vec![tmp.path().join("adir"), tmp.path().join("zdir")]
        );
    }

    #[test]
    fn test_list_dir_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(LocalFs.list_dir(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_copy_file_respects_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let from = tmp.path().join("from.txt");
        let to = tmp.path().join("to.txt");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "old").unwrap();

        let err = LocalFs.copy_file(&from, &to, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&to).unwrap(), "old");

        LocalFs.copy_file(&from, &to, true).unwrap();
        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn test_copy_file_onto_itself_keeps_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "precious").unwrap();

        let err = LocalFs.copy_file(&file, &file, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(classify(&err), IoClass::Other);
        assert_eq!(fs::read_to_string(&file).unwrap(), "precious");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_file_through_link_to_source_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "precious").unwrap();
        fs::create_dir(tmp.path().join("dst")).unwrap();
        let link = tmp.path().join("dst/a.txt");
        std::os::unix::fs::symlink(&file, &link).unwrap();

        assert!(LocalFs.copy_file(&file, &link, true).is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), "precious");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_file_recreates_directory_link() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("other")).unwrap();
        fs::write(tmp.path().join("other/x.txt"), "x").unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::create_dir_all(tmp.path().join("dst")).unwrap();
        let link = tmp.path().join("src/link");
        std::os::unix::fs::symlink("../other", &link).unwrap();

        let listing = LocalFs.list_dir(&tmp.path().join("src")).unwrap();
        assert_eq!(listing.files, vec![link.clone()]);

        let copied = tmp.path().join("dst/link");
        LocalFs.copy_file(&link, &copied, false).unwrap();
        assert!(LocalFs.is_symlink(&copied));
        assert_eq!(fs::read_link(&copied).unwrap(), Path::new("../other"));
        assert!(copied.join("x.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_file_on_link_keeps_target() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        fs::write(tmp.path().join("real/keep.txt"), "k").unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(tmp.path().join("real"), &link).unwrap();

        assert!(LocalFs.is_dir(&link));
        assert!(LocalFs.is_symlink(&link));
        LocalFs.remove_file(&link).unwrap();
        assert!(!LocalFs.exists(&link));
        assert!(tmp.path().join("real/keep.txt").exists());
    }

    #[test]
    fn test_classify() {
        let busy = io::Error::new(ErrorKind::ResourceBusy, "busy");
        let gone = io::Error::new(ErrorKind::NotFound, "gone");
        let denied = io::Error::new(ErrorKind::PermissionDenied, "denied");
        let other = io::Error::new(ErrorKind::InvalidData, "corrupt");

        assert_eq!(classify(&busy), IoClass::Conflict);
        assert_eq!(classify(&gone), IoClass::Conflict);
        assert_eq!(classify(&denied), IoClass::Access);
        assert_eq!(classify(&other), IoClass::Other);
    }
}
