use std::fmt;

// =============================================================================
// Listing Entries
// =============================================================================

/// Kind of a filesystem entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    /// Listing marker: `[D]` or `[F]`.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Directory => "[D]",
            Self::File => "[F]",
        }
    }
}

/// One row of the directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.marker(), self.name)
    }
}

// =============================================================================
// Entry Details
// =============================================================================

/// Attribute flags shown by `info`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pub read_only: bool,
    pub hidden: bool,
    pub symlink: bool,
    pub directory: bool,
}

impl Attributes {
    /// Human-readable labels for the set flags, in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.read_only {
            labels.push(if self.directory {
                "Read-only (applies to files in the directory)"
            } else {
                "Read-only"
            });
        }
        if self.hidden {
            labels.push("Hidden");
        }
        if self.symlink {
            labels.push("Symbolic link");
        }
        if self.directory {
            labels.push("Directory");
        }
        labels
    }
}

/// Everything `info` reports about one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    /// Name without extension for files, full name for directories
    pub name: String,
    pub kind: EntryKind,
    /// Extension with leading dot (files only, may be empty)
    pub extension: String,
    /// Parent directory
    pub location: String,
    /// Size in bytes; `None` when it could not be determined
    pub size: Option<u64>,
    /// Unix timestamps (seconds)
    pub created: Option<u64>,
    pub modified: Option<u64>,
    pub accessed: Option<u64>,
    pub attributes: Attributes,
}

/// What `info` reports about a drive or filesystem root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriveInfo {
    pub name: String,
    /// Filesystem type (e.g. `ext4`, `NTFS`) when the platform reports it
    pub file_system: Option<String>,
    pub total: Option<u64>,
    /// Space available to the current user
    pub free: Option<u64>,
}

impl DriveInfo {
    pub fn used(&self) -> Option<u64> {
        Some(self.total?.saturating_sub(self.free?))
    }
}
