//! Directory listing and pagination for the main window.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

use tracing::error;

use crate::core::session::SessionState;
use crate::models::{EntryKind, ListEntry, Notification};

pub const EMPTY_DIRECTORY: &str = "The directory is empty.";

pub const PAGE_OUT_OF_RANGE: &str = "There are no files on that page. Showing the first page.";

pub const UNREADABLE_DIRECTORY: &str =
    "There is a problem with the current directory. Try going to another directory.";

/// Entries of `dir`: directories first, then files, each sorted by name.
///
/// Symlinks are classified by what they point to; broken links are files.
pub fn list_entries(dir: &Path) -> io::Result<Vec<ListEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let kind = match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            _ => EntryKind::File,
        };
        entries.push(ListEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }
    entries.sort_by(compare_entries);
    Ok(entries)
}

fn compare_entries(a: &ListEntry, b: &ListEntry) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Number of pages needed for `total` entries (at least one).
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

/// The entries on 1-based `page`, or `None` if the page lies past the end.
pub fn page_slice(entries: &[ListEntry], page: usize, per_page: usize) -> Option<&[ListEntry]> {
    let per_page = per_page.max(1);
    let start = page.checked_sub(1)?.checked_mul(per_page)?;
    if start >= entries.len() {
        return None;
    }
    let end = start.saturating_add(per_page).min(entries.len());
    Some(&entries[start..end])
}

/// One screenful of the current directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageView {
    pub entries: Vec<ListEntry>,
    pub page: usize,
    pub pages: usize,
}

/// Build the page for the session's directory and page.
///
/// A page past the end falls back to the first one. Problems are reported
/// through the session notification without replacing a command's own
/// message, except that an unreadable directory always reports an error.
pub fn current_page(state: &mut SessionState, per_page: usize) -> PageView {
    let Some(dir) = state.current_dir() else {
        return PageView::default();
    };

    let entries = match list_entries(dir.as_path()) {
        Ok(entries) => entries,
        Err(err) => {
            error!(dir = %dir, error = %err, "cannot list current directory");
            state.set_notification(Notification::error(UNREADABLE_DIRECTORY));
            return PageView::default();
        }
    };

    let pages = page_count(entries.len(), per_page);

    if entries.is_empty() {
        notify_if_quiet(state, Notification::warning(EMPTY_DIRECTORY));
        return PageView {
            entries,
            page: state.page(),
            pages,
        };
    }

    let shown = match page_slice(&entries, state.page(), per_page) {
        Some(slice) => slice.to_vec(),
        None => {
            state.reset_page();
            notify_if_quiet(state, Notification::warning(PAGE_OUT_OF_RANGE));
            page_slice(&entries, state.page(), per_page)
                .map(<[ListEntry]>::to_vec)
                .unwrap_or_default()
        }
    };

    PageView {
        entries: shown,
        page: state.page(),
        pages,
    }
}

fn notify_if_quiet(state: &mut SessionState, notification: Notification) {
    if state.notification().is_empty() {
        state.set_notification(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::path::ResolvedPath;
    use crate::models::NotificationKind;

    fn entry(name: &str, kind: EntryKind) -> ListEntry {
        ListEntry {
            name: name.to_string(),
            kind,
        }
    }

    fn state_at(dir: &Path, page: usize) -> SessionState {
        SessionState::new(ResolvedPath::from_native(dir), page)
    }

    #[test]
    fn test_directories_first_then_alphabetical() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.txt"), "").unwrap();
        fs::write(tmp.path().join("A.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("zeta")).unwrap();
        fs::create_dir(tmp.path().join("Alpha")).unwrap();

        let entries = list_entries(tmp.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                entry("Alpha", EntryKind::Directory),
                entry("zeta", EntryKind::Directory),
                entry("A.txt", EntryKind::File),
                entry("b.txt", EntryKind::File),
            ]
        );
    }

    #[test]
    fn test_page_slice() {
        let entries: Vec<_> = (0..5).map(|i| entry(&i.to_string(), EntryKind::File)).collect();
        assert_eq!(page_slice(&entries, 1, 2).unwrap().len(), 2);
        assert_eq!(page_slice(&entries, 3, 2).unwrap(), &entries[4..]);
        assert!(page_slice(&entries, 4, 2).is_none());
        assert!(page_slice(&entries, 0, 2).is_none());
        assert!(page_slice(&[], 1, 2).is_none());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }

    #[test]
    fn test_page_past_end_resets_to_first() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        let mut state = state_at(tmp.path(), 9);

        let view = current_page(&mut state, 2);
        assert_eq!(state.page(), 1);
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.pages, 2);
        assert_eq!(state.notification().text, PAGE_OUT_OF_RANGE);
    }

    #[test]
    fn test_empty_directory_warns() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_at(tmp.path(), 1);

        let view = current_page(&mut state, 10);
        assert!(view.entries.is_empty());
        assert_eq!(state.notification().kind, NotificationKind::Warning);
        assert_eq!(state.notification().text, EMPTY_DIRECTORY);
    }

    #[test]
    fn test_command_message_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_at(tmp.path(), 1);
        state.set_notification(Notification::info("Deleted"));

        current_page(&mut state, 10);
        assert_eq!(state.notification().text, "Deleted");
    }

    #[test]
    fn test_unreadable_directory_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_at(&tmp.path().join("missing"), 1);

        let view = current_page(&mut state, 10);
        assert!(view.entries.is_empty());
        assert_eq!(state.notification().kind, NotificationKind::Error);
    }

    #[test]
    fn test_no_directory_is_blank() {
        let mut state = SessionState::new(None, 1);
        assert_eq!(current_page(&mut state, 10), PageView::default());
        assert!(state.notification().is_empty());
    }
}
