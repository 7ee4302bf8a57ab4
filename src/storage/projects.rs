//! Project repository for JSON storage
//!
//! Manages loading and saving projects to projects.json. Also answers the
//! subproject-tree query used by the project-scoped visibility branch.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CostlogError;
use crate::models::{Project, ProjectId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable project data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ProjectData {
    projects: Vec<Project>,
}

/// Repository for project persistence
pub struct ProjectRepository {
    path: PathBuf,
    data: RwLock<HashMap<ProjectId, Project>>,
}

impl ProjectRepository {
    /// Create a new project repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load projects from disk
    pub fn load(&self) -> Result<(), CostlogError> {
        let file_data: ProjectData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for project in file_data.projects {
            data.insert(project.id, project);
        }

        Ok(())
    }

    /// Save projects to disk
    pub fn save(&self) -> Result<(), CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut projects: Vec<_> = data.values().cloned().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));

        let file_data = ProjectData { projects };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a project by ID
    pub fn get(&self, id: ProjectId) -> Result<Option<Project>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find a project by name or a user-supplied ID form
    pub fn find(&self, identifier: &str) -> Result<Option<Project>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|p| p.name == identifier || p.id.matches(identifier))
            .cloned())
    }

    /// Get all projects
    pub fn get_all(&self) -> Result<Vec<Project>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut projects: Vec<_> = data.values().cloned().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    /// IDs of a project and every project below it in the tree
    pub fn subtree(&self, root: ProjectId) -> Result<BTreeSet<ProjectId>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result = BTreeSet::new();
        result.insert(root);
        let mut frontier = vec![root];
        while let Some(current) = frontier.pop() {
            for project in data.values() {
                if project.parent_id == Some(current) && result.insert(project.id) {
                    frontier.push(project.id);
                }
            }
        }
        Ok(result)
    }

    /// Insert or update a project
    pub fn upsert(&self, project: Project) -> Result<(), CostlogError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(project.id, project);
        Ok(())
    }

    /// Count projects
    pub fn count(&self) -> Result<usize, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
