//! Utility modules for display formatting.
//!
//! Provides:
//! - [`format_size`] - 1024-based human-readable sizes
//! - [`format_datetime`] - UTC timestamps
//! - [`format_entry_info`], [`format_drive_info`] - The text shown by `info`

mod format;

pub use format::{format_date_iso, format_datetime, format_drive_info, format_entry_info, format_size};
