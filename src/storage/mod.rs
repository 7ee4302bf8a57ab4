//! Storage layer for costlog
//!
//! Provides JSON file storage with atomic writes and in-memory indexes.
//! This is the "storage backend" the report engine hands its query
//! specification to.

pub mod cost_types;
pub mod entries;
pub mod file_io;
pub mod init;
pub mod issues;
pub mod projects;
pub mod users;

pub use cost_types::CostTypeRepository;
pub use entries::CostEntryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use issues::IssueRepository;
pub use projects::ProjectRepository;
pub use users::UserRepository;

use crate::config::paths::CostlogPaths;
use crate::error::CostlogError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: CostlogPaths,
    pub entries: CostEntryRepository,
    pub projects: ProjectRepository,
    pub issues: IssueRepository,
    pub users: UserRepository,
    pub cost_types: CostTypeRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: CostlogPaths) -> Result<Self, CostlogError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            entries: CostEntryRepository::new(paths.entries_file()),
            projects: ProjectRepository::new(paths.projects_file()),
            issues: IssueRepository::new(paths.issues_file()),
            users: UserRepository::new(paths.users_file()),
            cost_types: CostTypeRepository::new(paths.cost_types_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &CostlogPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), CostlogError> {
        self.entries.load()?;
        self.projects.load()?;
        self.issues.load()?;
        self.users.load()?;
        self.cost_types.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), CostlogError> {
        self.entries.save()?;
        self.projects.save()?;
        self.issues.save()?;
        self.users.save()?;
        self.cost_types.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }
}
