//! Formatting utilities for file sizes, dates, and entry details.

use crate::models::{DriveInfo, EntryInfo, EntryKind};

const SIZE_UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Shown when a value could not be determined.
pub const UNKNOWN: &str = "unknown";

/// Format a byte count with 1024-based units (e.g., "1.5 KB", "512 B").
///
/// Rounded to two decimals; trailing zeros are dropped.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_datetime(timestamp: u64) -> String {
    let secs_of_day = timestamp % 86400;
    format!(
        "{} {:02}:{:02}:{:02}",
        format_date_iso(timestamp),
        secs_of_day / 3600,
        (secs_of_day % 3600) / 60,
        secs_of_day % 60
    )
}

/// Format Unix timestamp as ISO date (YYYY-MM-DD).
///
/// Properly calculates year/month/day accounting for leap years.
pub fn format_date_iso(timestamp: u64) -> String {
    let mut remaining_days = (timestamp / 86400) as i64;
    let mut year = 1970i64;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let february = if is_leap_year(year) { 29 } else { 28 };
    let days_in_months: [i64; 12] = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut month = 1;
    for days_in_month in days_in_months {
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    format!("{:04}-{:02}-{:02}", year, month, remaining_days + 1)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn format_optional_time(timestamp: Option<u64>) -> String {
    timestamp.map_or_else(|| UNKNOWN.to_string(), format_datetime)
}

/// Render the details shown by `info`.
pub fn format_entry_info(info: &EntryInfo) -> String {
    let kind = match info.kind {
        EntryKind::File if info.extension.is_empty() => "File".to_string(),
        EntryKind::File => format!("File ({})", info.extension),
        EntryKind::Directory => "Folder".to_string(),
    };
    let size = format_optional_size(info.size);

    let mut out = String::new();
    out.push_str(&format!("Name:       {}\n", info.name));
    out.push_str(&format!("Type:       {}\n", kind));
    out.push_str(&format!("Location:   {}\n", info.location));
    out.push_str(&format!("Size:       {}\n", size));
    out.push_str(&format!("Created:    {}\n", format_optional_time(info.created)));
    out.push_str(&format!("Modified:   {}\n", format_optional_time(info.modified)));
    out.push_str(&format!("Accessed:   {}\n", format_optional_time(info.accessed)));
    out.push_str("\nAttributes:\n");
    for label in info.attributes.labels() {
        out.push_str(&format!("            {}\n", label));
    }
    out
}

fn format_optional_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) => format!("{} ({} bytes)", format_size(bytes), bytes),
        None => format!("{UNKNOWN} ({UNKNOWN})"),
    }
}

/// Render the details shown by `info` for a drive root.
pub fn format_drive_info(drive: &DriveInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("Name:        {}\n", drive.name));
    out.push_str("Type:        Drive\n");
    out.push_str(&format!(
        "File system: {}\n",
        drive.file_system.as_deref().unwrap_or(UNKNOWN)
    ));
    out.push_str(&format!("Used:        {}\n", format_optional_size(drive.used())));
    out.push_str(&format!("Free:        {}\n", format_optional_size(drive.free)));
    out.push_str(&format!("Capacity:    {}\n", format_optional_size(drive.total)));
    out
}
