//! Issue repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CostlogError;
use crate::models::{Issue, IssueId, ProjectId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable issue data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct IssueData {
    issues: Vec<Issue>,
}

/// Repository for issue persistence
pub struct IssueRepository {
    path: PathBuf,
    data: RwLock<HashMap<IssueId, Issue>>,
}

impl IssueRepository {
    /// Create a new issue repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load issues from disk
    pub fn load(&self) -> Result<(), CostlogError> {
        let file_data: IssueData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for issue in file_data.issues {
            data.insert(issue.id, issue);
        }

        Ok(())
    }

    /// Save issues to disk
    pub fn save(&self) -> Result<(), CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut issues: Vec<_> = data.values().cloned().collect();
        issues.sort_by(|a, b| a.subject.cmp(&b.subject));

        let file_data = IssueData { issues };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an issue by ID
    pub fn get(&self, id: IssueId) -> Result<Option<Issue>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find an issue by subject or a user-supplied ID form
    pub fn find(&self, identifier: &str) -> Result<Option<Issue>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|i| i.subject == identifier || i.id.matches(identifier))
            .cloned())
    }

    /// Get all issues for a project
    pub fn get_by_project(&self, project_id: ProjectId) -> Result<Vec<Issue>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut issues: Vec<_> = data
            .values()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect();
        issues.sort_by(|a, b| a.subject.cmp(&b.subject));
        Ok(issues)
    }

    /// Insert or update an issue
    pub fn upsert(&self, issue: Issue) -> Result<(), CostlogError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(issue.id, issue);
        Ok(())
    }
}
