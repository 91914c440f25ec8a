pub mod format;

pub use format::{format_date, format_file_size, TagPalette, TAG_SLOTS};
