//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`Notification`], [`NotificationKind`] - Messages shown under the listing
//! - [`ListEntry`], [`EntryKind`] - Directory listing rows
//! - [`EntryInfo`], [`Attributes`], [`DriveInfo`] - Details reported by `info`

mod entry;
mod notification;

pub use entry::{Attributes, DriveInfo, EntryInfo, EntryKind, ListEntry};
pub use notification::{Notification, NotificationKind};
