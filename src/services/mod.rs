//! Business logic services
//!
//! The entry editor: authorized create/update/delete of single cost
//! entries. Listing logic lives in `report`.

pub mod entry_editor;

pub use entry_editor::{EntryEditor, EntryPayload};
