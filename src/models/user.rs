//! User model

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// A user who records or views cost entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Login name, unique across users
    pub login: String,

    /// Display name
    pub name: String,
}

impl User {
    /// Create a new user
    pub fn new(login: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            login: login.into(),
            name: name.into(),
        }
    }
}
