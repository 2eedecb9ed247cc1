//! Metadata gathering for the `info` command.
//!
//! Drive roots are reported by capacity rather than by walking the whole
//! volume.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::core::path::ResolvedPath;
use crate::models::{Attributes, DriveInfo, EntryInfo, EntryKind};

/// Collect the details of the file or directory at `path`.
pub fn inspect(path: &ResolvedPath) -> io::Result<EntryInfo> {
    let target = path.as_path();
    let link = fs::symlink_metadata(target)?;
    // Report the target of a symlink, but keep the link flag
    let meta = if link.file_type().is_symlink() {
        fs::metadata(target).unwrap_or_else(|_| link.clone())
    } else {
        link.clone()
    };

    let full_name = path.file_name().unwrap_or(path.as_str()).to_string();
    let location = path.parent().map(|p| p.to_string()).unwrap_or_default();
    let attributes = attributes(&full_name, &meta, link.file_type().is_symlink());

    let (kind, name, extension, size) = if meta.is_dir() {
        (EntryKind::Directory, full_name, String::new(), directory_size(target))
    } else {
        let (stem, ext) = split_name(&full_name);
        (EntryKind::File, stem.to_string(), ext.to_string(), Some(meta.len()))
    };

    Ok(EntryInfo {
        name,
        kind,
        extension,
        location,
        size,
        created: timestamp(meta.created()),
        modified: timestamp(meta.modified()),
        accessed: timestamp(meta.accessed()),
        attributes,
    })
}

/// Collect capacity details for a drive or filesystem root.
///
/// Values the platform cannot report are left as `None`.
pub fn inspect_drive(root: &ResolvedPath) -> io::Result<DriveInfo> {
    let target = root.as_path();
    if !fs::metadata(target)?.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotADirectory, "not a drive root"));
    }

    let (total, free) = match space(target) {
        Ok(space) => space,
        Err(err) => {
            debug!(root = %root, error = %err, "drive capacity unavailable");
            (None, None)
        }
    };

    Ok(DriveInfo {
        name: root.to_string(),
        file_system: file_system(target),
        total,
        free,
    })
}

#[cfg(unix)]
fn space(root: &Path) -> io::Result<(Option<u64>, Option<u64>)> {
    let stat = rustix::fs::statvfs(root).map_err(io::Error::from)?;
    let block = stat.f_frsize;
    Ok((
        stat.f_blocks.checked_mul(block),
        stat.f_bavail.checked_mul(block),
    ))
}

#[cfg(not(unix))]
fn space(_root: &Path) -> io::Result<(Option<u64>, Option<u64>)> {
    Ok((None, None))
}

/// Filesystem type of the mount at `root`, from the kernel mount table.
#[cfg(target_os = "linux")]
fn file_system(root: &Path) -> Option<String> {
    let mounts = fs::read_to_string("/proc/self/mounts").ok()?;
    mount_type(&mounts, root)
}

#[cfg(not(target_os = "linux"))]
fn file_system(_root: &Path) -> Option<String> {
    None
}

/// The last mount table entry for `root` wins; later mounts shadow earlier ones.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn mount_type(mounts: &str, root: &Path) -> Option<String> {
    mounts
        .lines()
        .rev()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            Some((mount_point, fs_type))
        })
        .find(|(mount_point, _)| Path::new(mount_point) == root)
        .map(|(_, fs_type)| fs_type.to_string())
}

/// Sum of all file lengths below `dir`, or `None` if any part is unreadable.
///
/// Symlinks are counted by their own size and never followed.
pub fn directory_size(dir: &Path) -> Option<u64> {
    let mut total = 0u64;
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %current.display(), error = %err, "size unavailable");
                return None;
            }
        };
        for entry in entries {
            let entry = entry.ok()?;
            let meta = entry.metadata().ok()?;
            if meta.is_dir() {
                stack.push(entry.path());
            } else {
                total = total.saturating_add(meta.len());
            }
        }
    }

    Some(total)
}

fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(i) => name.split_at(i),
    }
}

fn timestamp(time: io::Result<SystemTime>) -> Option<u64> {
    time.ok()?
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

fn attributes(name: &str, meta: &Metadata, symlink: bool) -> Attributes {
    Attributes {
        read_only: meta.permissions().readonly(),
        hidden: is_hidden(name, meta),
        symlink,
        directory: meta.is_dir(),
    }
}

#[cfg(windows)]
fn is_hidden(_name: &str, meta: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn is_hidden(name: &str, _meta: &Metadata) -> bool {
    name.starts_with('.')
}
