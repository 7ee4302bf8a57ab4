//! User repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CostlogError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), CostlogError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.login.cmp(&b.login));

        let file_data = UserData { users };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> Result<Option<User>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find a user by login or a user-supplied ID form
    pub fn find(&self, identifier: &str) -> Result<Option<User>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|u| u.login == identifier || u.id.matches(identifier))
            .cloned())
    }

    /// Get all users
    pub fn get_all(&self) -> Result<Vec<User>, CostlogError> {
        let data = self
            .data
            .read()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.login.cmp(&b.login));
        Ok(users)
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> Result<(), CostlogError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CostlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(user.id, user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_by_login() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        repo.load().unwrap();

        let user = User::new("jsmith", "Jay Smith");
        repo.upsert(user.clone()).unwrap();

        assert!(repo.find("jsmith").unwrap().is_some());
        assert!(repo.find(&user.id.to_string()).unwrap().is_some());
        assert!(repo.find("nobody").unwrap().is_none());
    }
}
