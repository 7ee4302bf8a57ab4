//! Cost entry repository for JSON storage
//!
//! Manages loading and saving cost entries to entries.json, with in-memory
//! indexes by project and by issue to serve the scoped listing queries.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::CostlogError;
use crate::models::{CostEntry, CostEntryId, IssueId, ProjectId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable cost entry data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EntryData {
    entries: Vec<CostEntry>,
}

/// Repository for cost entry persistence with indexing
pub struct CostEntryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CostEntryId, CostEntry>>,
    /// Index: project_id -> entry_ids
    by_project: RwLock<HashMap<ProjectId, Vec<CostEntryId>>>,
    /// Index: issue_id -> entry_ids
    by_issue: RwLock<HashMap<IssueId, Vec<CostEntryId>>>,
}

impl CostEntryRepository {
    /// Create a new cost entry repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_project: RwLock::new(HashMap::new()),
            by_issue: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk and build indexes
    pub fn load(&self) -> Result<(), CostlogError> {
        let file_data: EntryData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_project = self
            .by_project
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_issue = self
            .by_issue
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_project.clear();
        by_issue.clear();

        for entry in file_data.entries {
            let id = entry.id;
            by_project.entry(entry.project_id).or_default().push(id);
            if let Some(issue_id) = entry.issue_id {
                by_issue.entry(issue_id).or_default().push(id);
            }
            data.insert(id, entry);
        }

        Ok(())
    }

    /// Save entries to disk
    pub fn save(&self) -> Result<(), CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.spent_on
                .cmp(&a.spent_on)
                .then(b.created_on.cmp(&a.created_on))
        });

        let file_data = EntryData { entries };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an entry by ID
    pub fn get(&self, id: CostEntryId) -> Result<Option<CostEntry>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find an entry by a user-supplied identifier (full UUID or short form)
    pub fn find(&self, identifier: &str) -> Result<Option<CostEntry>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|e| e.id.matches(identifier))
            .cloned())
    }

    /// Get all entries
    pub fn get_all(&self) -> Result<Vec<CostEntry>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().cloned().collect())
    }

    /// Get entries for a set of projects
    pub fn get_by_projects(
        &self,
        project_ids: &BTreeSet<ProjectId>,
    ) -> Result<Vec<CostEntry>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_project = self
            .by_project
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut entries = Vec::new();
        for project_id in project_ids {
            let ids = by_project
                .get(project_id)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            entries.extend(ids.iter().filter_map(|id| data.get(id).cloned()));
        }
        Ok(entries)
    }

    /// Get entries for an issue
    pub fn get_by_issue(&self, issue_id: IssueId) -> Result<Vec<CostEntry>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_issue = self
            .by_issue
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_issue.get(&issue_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    /// Earliest and latest `spent_on` among entries in the given projects
    pub fn spent_on_bounds(
        &self,
        project_ids: &BTreeSet<ProjectId>,
    ) -> Result<(Option<NaiveDate>, Option<NaiveDate>), CostlogError> {
        let entries = self.get_by_projects(project_ids)?;
        let min = entries.iter().map(|e| e.spent_on).min();
        let max = entries.iter().map(|e| e.spent_on).max();
        Ok((min, max))
    }

    /// Insert or update an entry
    pub fn upsert(&self, entry: CostEntry) -> Result<(), CostlogError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_project = self
            .by_project
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_issue = self
            .by_issue
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from old indexes if updating
        if let Some(old) = data.get(&entry.id) {
            if let Some(ids) = by_project.get_mut(&old.project_id) {
                ids.retain(|&id| id != entry.id);
            }
            if let Some(issue_id) = old.issue_id {
                if let Some(ids) = by_issue.get_mut(&issue_id) {
                    ids.retain(|&id| id != entry.id);
                }
            }
        }

        // Add to new indexes
        by_project.entry(entry.project_id).or_default().push(entry.id);
        if let Some(issue_id) = entry.issue_id {
            by_issue.entry(issue_id).or_default().push(entry.id);
        }

        data.insert(entry.id, entry);
        Ok(())
    }

    /// Delete an entry
    pub fn delete(&self, id: CostEntryId) -> Result<bool, CostlogError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_project = self
            .by_project
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_issue = self
            .by_issue
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(entry) = data.remove(&id) {
            if let Some(ids) = by_project.get_mut(&entry.project_id) {
                ids.retain(|&eid| eid != id);
            }
            if let Some(issue_id) = entry.issue_id {
                if let Some(ids) = by_issue.get_mut(&issue_id) {
                    ids.retain(|&eid| eid != id);
                }
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count entries
    pub fn count(&self) -> Result<usize, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
