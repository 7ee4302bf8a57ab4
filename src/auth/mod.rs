//! Capability checks
//!
//! The query and mutation paths never inspect memberships directly; they go
//! through the [`Authorizer`] trait so tests can substitute a fake. The
//! shipped implementation consults the memberships stored on each project.

use std::collections::BTreeSet;

use crate::error::{CostlogError, CostlogResult};
use crate::models::{CostEntry, Permission, ProjectId, UserId};
use crate::storage::Storage;

/// Capability-check oracle: "can user U do action A on scope S?"
pub trait Authorizer {
    /// May the user view cost entries within this project?
    fn can_view(&self, user: UserId, project: ProjectId) -> CostlogResult<bool>;

    /// May the user book costs on this project (including being named as
    /// an entry's owner)?
    fn can_book_costs(&self, user: UserId, project: ProjectId) -> CostlogResult<bool>;

    /// May the user edit or delete this entry?
    fn can_edit(&self, user: UserId, entry: &CostEntry) -> CostlogResult<bool>;

    /// The projects whose cost entries the user may view
    fn viewable_projects(&self, user: UserId) -> CostlogResult<BTreeSet<ProjectId>>;

    /// May the user view cost entries anywhere at all?
    fn can_view_any(&self, user: UserId) -> CostlogResult<bool> {
        Ok(!self.viewable_projects(user)?.is_empty())
    }
}

/// Authorizer backed by the memberships stored on each project
pub struct MembershipAuthorizer<'a> {
    storage: &'a Storage,
}

impl<'a> MembershipAuthorizer<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn project_grants(&self, user: UserId, project: ProjectId, permission: Permission) -> CostlogResult<bool> {
        let project = self
            .storage
            .projects
            .get(project)?
            .ok_or_else(|| CostlogError::project_not_found(project.to_string()))?;
        Ok(project.grants(user, permission))
    }
}

impl Authorizer for MembershipAuthorizer<'_> {
    fn can_view(&self, user: UserId, project: ProjectId) -> CostlogResult<bool> {
        self.project_grants(user, project, Permission::ViewCostEntries)
    }

    fn can_book_costs(&self, user: UserId, project: ProjectId) -> CostlogResult<bool> {
        self.project_grants(user, project, Permission::BookCosts)
    }

    fn can_edit(&self, user: UserId, entry: &CostEntry) -> CostlogResult<bool> {
        if self.project_grants(user, entry.project_id, Permission::EditCostEntries)? {
            return Ok(true);
        }
        if entry.user_id == user {
            return self.project_grants(user, entry.project_id, Permission::EditOwnCostEntries);
        }
        Ok(false)
    }

    fn viewable_projects(&self, user: UserId) -> CostlogResult<BTreeSet<ProjectId>> {
        Ok(self
            .storage
            .projects
            .get_all()?
            .into_iter()
            .filter(|p| p.grants(user, Permission::ViewCostEntries))
            .map(|p| p.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CostlogPaths;
    use crate::models::{CostTypeId, Money, Project, User};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn entry_for(project: ProjectId, owner: UserId) -> CostEntry {
        let mut entry = CostEntry::new(
            project,
            None,
            owner,
            CostTypeId::new(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        entry.units = 1.0;
        entry.costs = Money::from_cents(100);
        entry
    }

    #[test]
    fn test_view_requires_membership_permission() {
        let (_temp_dir, storage) = create_test_storage();
        let viewer = User::new("viewer", "Viewer");
        let outsider = User::new("outsider", "Outsider");
        let mut project = Project::new("Website");
        project.add_member(viewer.id, vec![Permission::ViewCostEntries]);
        storage.projects.upsert(project.clone()).unwrap();

        let auth = MembershipAuthorizer::new(&storage);
        assert!(auth.can_view(viewer.id, project.id).unwrap());
        assert!(!auth.can_view(outsider.id, project.id).unwrap());
        assert!(auth.can_view_any(viewer.id).unwrap());
        assert!(!auth.can_view_any(outsider.id).unwrap());
    }

    #[test]
    fn test_can_edit_own_vs_any() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = UserId::new();
        let manager = UserId::new();
        let other = UserId::new();

        let mut project = Project::new("Website");
        project.add_member(owner, vec![Permission::EditOwnCostEntries]);
        project.add_member(manager, vec![Permission::EditCostEntries]);
        project.add_member(other, vec![Permission::EditOwnCostEntries]);
        storage.projects.upsert(project.clone()).unwrap();

        let entry = entry_for(project.id, owner);
        let auth = MembershipAuthorizer::new(&storage);

        assert!(auth.can_edit(owner, &entry).unwrap());
        assert!(auth.can_edit(manager, &entry).unwrap());
        // edit_own does not extend to someone else's entry
        assert!(!auth.can_edit(other, &entry).unwrap());
    }

    #[test]
    fn test_viewable_projects() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();

        let mut visible = Project::new("Visible");
        visible.add_member(user, vec![Permission::ViewCostEntries]);
        let hidden = Project::new("Hidden");
        storage.projects.upsert(visible.clone()).unwrap();
        storage.projects.upsert(hidden).unwrap();

        let auth = MembershipAuthorizer::new(&storage);
        let projects = auth.viewable_projects(user).unwrap();
        assert_eq!(projects.len(), 1);
        assert!(projects.contains(&visible.id));
    }
}
