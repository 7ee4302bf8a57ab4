//! Export functionality
//!
//! CSV serialization of report rows.

pub mod csv;

pub use csv::{write_entries, EXPORT_FILENAME, EXPORT_HEADERS};
