//! Cost type repository for JSON storage
//!
//! Also answers the system-wide default cost type lookup. Setting a new
//! default clears the flag on every other type so at most one holds it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CostlogError;
use crate::models::{CostType, CostTypeId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable cost type data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CostTypeData {
    cost_types: Vec<CostType>,
}

/// Repository for cost type persistence
pub struct CostTypeRepository {
    path: PathBuf,
    data: RwLock<HashMap<CostTypeId, CostType>>,
}

impl CostTypeRepository {
    /// Create a new cost type repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load cost types from disk
    pub fn load(&self) -> Result<(), CostlogError> {
        let file_data: CostTypeData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for cost_type in file_data.cost_types {
            data.insert(cost_type.id, cost_type);
        }

        Ok(())
    }

    /// Save cost types to disk
    pub fn save(&self) -> Result<(), CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut cost_types: Vec<_> = data.values().cloned().collect();
        cost_types.sort_by(|a, b| a.name.cmp(&b.name));

        let file_data = CostTypeData { cost_types };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a cost type by ID
    pub fn get(&self, id: CostTypeId) -> Result<Option<CostType>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find a cost type by name or a user-supplied ID form
    pub fn find(&self, identifier: &str) -> Result<Option<CostType>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|ct| ct.name == identifier || ct.id.matches(identifier))
            .cloned())
    }

    /// Get all cost types
    pub fn get_all(&self) -> Result<Vec<CostType>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut cost_types: Vec<_> = data.values().cloned().collect();
        cost_types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cost_types)
    }

    /// Get the system-wide default cost type, if one has been designated
    pub fn default_type(&self) -> Result<Option<CostType>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|ct| ct.is_default).cloned())
    }

    /// Insert or update a cost type
    pub fn upsert(&self, cost_type: CostType) -> Result<(), CostlogError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Exactly one default: designating a new one clears the others.
        if cost_type.is_default {
            for other in data.values_mut() {
                other.is_default = false;
            }
        }

        data.insert(cost_type.id, cost_type);
        Ok(())
    }
}
