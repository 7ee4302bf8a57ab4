//! Session state for costlog
//!
//! Persists the per-listing-context sort preference between invocations.
//! Each listing context (global, a project, an issue) keeps its own
//! preference, so toggling the sort in one listing leaves the others
//! untouched. Resolution itself is pure (`SortState::resolve`); this file
//! only stores the result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::paths::CostlogPaths;
use crate::error::CostlogError;
use crate::query::sort::SortState;

/// Persisted per-listing-context preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Sort preference keyed by listing context
    #[serde(default)]
    sort: HashMap<String, SortState>,
}

impl SessionState {
    /// Load session state from disk, or start empty if the file is missing
    pub fn load_or_create(paths: &CostlogPaths) -> Result<Self, CostlogError> {
        let session_path = paths.session_file();

        if session_path.exists() {
            let contents = std::fs::read_to_string(&session_path)
                .map_err(|e| CostlogError::Io(format!("Failed to read session file: {}", e)))?;

            serde_json::from_str(&contents)
                .map_err(|e| CostlogError::Config(format!("Failed to parse session file: {}", e)))
        } else {
            Ok(SessionState::default())
        }
    }

    /// Save session state to disk
    pub fn save(&self, paths: &CostlogPaths) -> Result<(), CostlogError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CostlogError::Config(format!("Failed to serialize session: {}", e)))?;

        std::fs::write(paths.session_file(), contents)
            .map_err(|e| CostlogError::Io(format!("Failed to write session file: {}", e)))?;

        Ok(())
    }

    /// The stored sort preference for a listing context, if any
    pub fn sort_for(&self, listing_key: &str) -> Option<SortState> {
        self.sort.get(listing_key).copied()
    }

    /// Store the sort preference for a listing context
    pub fn set_sort(&mut self, listing_key: impl Into<String>, state: SortState) {
        self.sort.insert(listing_key.into(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::sort::SortKey;
    use tempfile::TempDir;

    #[test]
    fn test_empty_session_has_no_preferences() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let session = SessionState::load_or_create(&paths).unwrap();
        assert!(session.sort_for("global").is_none());
    }

    #[test]
    fn test_sort_preferences_are_per_context() {
        let mut session = SessionState::default();
        session.set_sort(
            "project:prj-1",
            SortState {
                key: SortKey::Units,
                descending: true,
            },
        );

        assert!(session.sort_for("project:prj-1").is_some());
        assert!(session.sort_for("project:prj-2").is_none());
        assert!(session.sort_for("global").is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut session = SessionState::default();
        session.set_sort(
            "global",
            SortState {
                key: SortKey::Costs,
                descending: false,
            },
        );
        session.save(&paths).unwrap();

        let loaded = SessionState::load_or_create(&paths).unwrap();
        let state = loaded.sort_for("global").unwrap();
        assert_eq!(state.key, SortKey::Costs);
        assert!(!state.descending);
    }
}
