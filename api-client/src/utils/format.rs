//! Display helpers shared by every listing

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Number of distinct tag colours
pub const TAG_SLOTS: usize = 10;

/// Human readable size: bytes below 1 KB, then KB/MB/GB with two decimals
pub fn format_file_size(bytes: u64) -> String {
    match bytes {
        b if b < KB => format!("{} B", b),
        b if b < MB => format!("{:.2} KB", b as f64 / KB as f64),
        b if b < GB => format!("{:.2} MB", b as f64 / MB as f64),
        b => format!("{:.2} GB", b as f64 / GB as f64),
    }
}

/// Render a backend timestamp as `Mar 5, 2024`; unparseable input is returned as-is
pub fn format_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Assigns each tag a colour slot the first time it is seen
///
/// Slots cycle through [`TAG_SLOTS`] values, so the same tag always gets
/// the same slot for the lifetime of the palette.
#[derive(Debug, Default)]
pub struct TagPalette {
    slots: HashMap<String, usize>,
    next: usize,
}

impl TagPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&mut self, tag: &str) -> usize {
        if let Some(slot) = self.slots.get(tag) {
            return *slot;
        }
        let slot = self.next % TAG_SLOTS;
        self.slots.insert(tag.to_string(), slot);
        self.next += 1;
        slot
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
