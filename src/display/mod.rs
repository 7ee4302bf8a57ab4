//! Display formatting for terminal output

pub mod entry;

pub use entry::{format_entry_row, format_feed, format_paged_report};
