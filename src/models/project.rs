//! Project model
//!
//! Projects are the scoping container for cost entries. They form a tree via
//! `parent_id` and carry the memberships that the authorizer consults.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ProjectId, UserId};

/// A capability a member can hold on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// See the project's cost entries in listings, feeds and exports
    ViewCostEntries,
    /// Record cost entries on the project (also required to be named as
    /// an entry's owner by someone else)
    BookCosts,
    /// Edit or delete any cost entry on the project
    EditCostEntries,
    /// Edit or delete only one's own cost entries
    EditOwnCostEntries,
}

impl Permission {
    /// Parse a permission name as used on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" | "view_cost_entries" => Some(Self::ViewCostEntries),
            "book" | "book_costs" => Some(Self::BookCosts),
            "edit" | "edit_cost_entries" => Some(Self::EditCostEntries),
            "edit_own" | "edit_own_cost_entries" => Some(Self::EditOwnCostEntries),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ViewCostEntries => "view_cost_entries",
            Self::BookCosts => "book_costs",
            Self::EditCostEntries => "edit_cost_entries",
            Self::EditOwnCostEntries => "edit_own_cost_entries",
        };
        write!(f, "{}", name)
    }
}

/// A user's membership on a project with the capabilities it grants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub permissions: Vec<Permission>,
}

impl Membership {
    pub fn new(user_id: UserId, permissions: Vec<Permission>) -> Self {
        Self {
            user_id,
            permissions,
        }
    }

    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// A project that cost entries are recorded against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Display name
    pub name: String,

    /// Parent project, when this is a subproject
    pub parent_id: Option<ProjectId>,

    /// Memberships granting capabilities on this project
    #[serde(default)]
    pub members: Vec<Membership>,
}

impl Project {
    /// Create a new top-level project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            parent_id: None,
            members: Vec::new(),
        }
    }

    /// Create a new subproject
    pub fn with_parent(name: impl Into<String>, parent_id: ProjectId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(name)
        }
    }

    /// Check whether a user holds a capability on this project
    pub fn grants(&self, user_id: UserId, permission: Permission) -> bool {
        self.members
            .iter()
            .any(|m| m.user_id == user_id && m.grants(permission))
    }

    /// Grant capabilities to a user, merging with an existing membership
    pub fn add_member(&mut self, user_id: UserId, permissions: Vec<Permission>) {
        if let Some(existing) = self.members.iter_mut().find(|m| m.user_id == user_id) {
            for p in permissions {
                if !existing.permissions.contains(&p) {
                    existing.permissions.push(p);
                }
            }
        } else {
            self.members.push(Membership::new(user_id, permissions));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants() {
        let mut project = Project::new("Website");
        let user = UserId::new();
        assert!(!project.grants(user, Permission::ViewCostEntries));

        project.add_member(user, vec![Permission::ViewCostEntries]);
        assert!(project.grants(user, Permission::ViewCostEntries));
        assert!(!project.grants(user, Permission::BookCosts));
    }

    #[test]
    fn test_add_member_merges_permissions() {
        let mut project = Project::new("Website");
        let user = UserId::new();
        project.add_member(user, vec![Permission::ViewCostEntries]);
        project.add_member(
            user,
            vec![Permission::ViewCostEntries, Permission::BookCosts],
        );

        assert_eq!(project.members.len(), 1);
        assert_eq!(project.members[0].permissions.len(), 2);
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!(Permission::parse("view"), Some(Permission::ViewCostEntries));
        assert_eq!(Permission::parse("book_costs"), Some(Permission::BookCosts));
        assert_eq!(Permission::parse("bogus"), None);
    }

    #[test]
    fn test_subproject_parent() {
        let parent = Project::new("Website");
        let child = Project::with_parent("Website API", parent.id);
        assert_eq!(child.parent_id, Some(parent.id));
    }
}
