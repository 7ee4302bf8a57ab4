//! Request scope resolution
//!
//! Turns raw scope selectors (project / issue / cost-type identifiers) into
//! a [`ScopeContext`] resolved once per request and threaded through the
//! engine. Resolution also enforces the listing authorization gate: failures
//! surface before any query runs.

use crate::auth::Authorizer;
use crate::error::{CostlogError, CostlogResult};
use crate::models::{CostEntry, CostType, Issue, Project, UserId};
use crate::storage::Storage;

/// Raw identifiers taken from the request
#[derive(Debug, Clone, Default)]
pub struct ScopeSelectors {
    pub project: Option<String>,
    pub issue: Option<String>,
    pub cost_type: Option<String>,
}

/// The resolved `{project, issue, cost_type}` triple for one request
#[derive(Debug, Clone, Default)]
pub struct ScopeContext {
    pub project: Option<Project>,
    pub issue: Option<Issue>,
    pub cost_type: Option<CostType>,
}

impl ScopeContext {
    /// A stable key naming this listing context, used to keep sort
    /// preferences separate per listing
    pub fn listing_key(&self) -> String {
        if let Some(issue) = &self.issue {
            format!("issue:{}", issue.id)
        } else if let Some(project) = &self.project {
            format!("project:{}", project.id)
        } else {
            "global".to_string()
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve the optional scope for the listing actions (report, feed,
/// export) and enforce the view capability.
///
/// An issue selector implies its project. A non-empty identifier that
/// resolves to nothing is a hard not-found; an absent one simply leaves
/// that part of the scope unset. The caller must hold view-cost-entries on
/// the named project, or on at least one project when none is named.
pub fn resolve_listing_scope<A: Authorizer>(
    storage: &Storage,
    authorizer: &A,
    caller: UserId,
    selectors: &ScopeSelectors,
) -> CostlogResult<ScopeContext> {
    let mut scope = ScopeContext::default();

    if let Some(issue_ident) = present(&selectors.issue) {
        let issue = storage
            .issues
            .find(issue_ident)?
            .ok_or_else(|| CostlogError::issue_not_found(issue_ident))?;
        let project = storage
            .projects
            .get(issue.project_id)?
            .ok_or_else(|| CostlogError::project_not_found(issue.project_id.to_string()))?;
        scope.issue = Some(issue);
        scope.project = Some(project);
    } else if let Some(project_ident) = present(&selectors.project) {
        let project = storage
            .projects
            .find(project_ident)?
            .ok_or_else(|| CostlogError::project_not_found(project_ident))?;
        scope.project = Some(project);
    }

    if let Some(cost_type_ident) = present(&selectors.cost_type) {
        let cost_type = storage
            .cost_types
            .find(cost_type_ident)?
            .ok_or_else(|| CostlogError::cost_type_not_found(cost_type_ident))?;
        scope.cost_type = Some(cost_type);
    }

    // Deny before any query runs; no partial data leaks past this point.
    let allowed = match &scope.project {
        Some(project) => authorizer.can_view(caller, project.id)?,
        None => authorizer.can_view_any(caller)?,
    };
    if !allowed {
        return Err(CostlogError::Forbidden("view cost entries".into()));
    }

    Ok(scope)
}

/// The scope of a single-entry action: the entry (when it already exists)
/// and the project it belongs to.
#[derive(Debug, Clone)]
pub struct EntryScope {
    pub entry: Option<CostEntry>,
    pub project: Project,
    pub issue: Option<Issue>,
}

/// Selectors for the single-entry actions (edit / destroy)
#[derive(Debug, Clone, Default)]
pub struct EntrySelectors {
    pub entry: Option<String>,
    pub issue: Option<String>,
    pub project: Option<String>,
}

/// Resolve the scope for the single-entry actions.
///
/// The entry, its parent issue, or a project must be identifiable from the
/// request; when none of the three resolves, the request is not-found.
pub fn resolve_entry_scope(
    storage: &Storage,
    selectors: &EntrySelectors,
) -> CostlogResult<EntryScope> {
    if let Some(entry_ident) = present(&selectors.entry) {
        let entry = storage
            .entries
            .find(entry_ident)?
            .ok_or_else(|| CostlogError::entry_not_found(entry_ident))?;
        let project = storage
            .projects
            .get(entry.project_id)?
            .ok_or_else(|| CostlogError::project_not_found(entry.project_id.to_string()))?;
        let issue = match entry.issue_id {
            Some(issue_id) => storage.issues.get(issue_id)?,
            None => None,
        };
        return Ok(EntryScope {
            entry: Some(entry),
            project,
            issue,
        });
    }

    if let Some(issue_ident) = present(&selectors.issue) {
        let issue = storage
            .issues
            .find(issue_ident)?
            .ok_or_else(|| CostlogError::issue_not_found(issue_ident))?;
        let project = storage
            .projects
            .get(issue.project_id)?
            .ok_or_else(|| CostlogError::project_not_found(issue.project_id.to_string()))?;
        return Ok(EntryScope {
            entry: None,
            project,
            issue: Some(issue),
        });
    }

    if let Some(project_ident) = present(&selectors.project) {
        let project = storage
            .projects
            .find(project_ident)?
            .ok_or_else(|| CostlogError::project_not_found(project_ident))?;
        return Ok(EntryScope {
            entry: None,
            project,
            issue: None,
        });
    }

    Err(CostlogError::NotFound {
        entity_type: "Cost entry scope",
        identifier: "no entry, issue or project given".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MembershipAuthorizer;
    use crate::config::paths::CostlogPaths;
    use crate::models::{CostType, Money, Permission, Project, User};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn viewer_on(storage: &Storage, project: &mut Project) -> UserId {
        let user = User::new("viewer", "Viewer");
        project.add_member(user.id, vec![Permission::ViewCostEntries]);
        storage.users.upsert(user.clone()).unwrap();
        user.id
    }

    #[test]
    fn test_issue_selector_implies_project() {
        let (_temp_dir, storage) = create_test_storage();
        let mut project = Project::new("Website");
        let caller = viewer_on(&storage, &mut project);
        storage.projects.upsert(project.clone()).unwrap();

        let issue = crate::models::Issue::new(project.id, "Crash on save", "Defect");
        storage.issues.upsert(issue.clone()).unwrap();

        let auth = MembershipAuthorizer::new(&storage);
        let selectors = ScopeSelectors {
            issue: Some("Crash on save".into()),
            ..Default::default()
        };
        let scope = resolve_listing_scope(&storage, &auth, caller, &selectors).unwrap();
        assert_eq!(scope.issue.unwrap().id, issue.id);
        assert_eq!(scope.project.unwrap().id, project.id);
    }

    #[test]
    fn test_unresolvable_cost_type_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let mut project = Project::new("Website");
        let caller = viewer_on(&storage, &mut project);
        storage.projects.upsert(project).unwrap();

        let auth = MembershipAuthorizer::new(&storage);
        let selectors = ScopeSelectors {
            project: Some("Website".into()),
            cost_type: Some("Materials".into()),
            ..Default::default()
        };
        let err = resolve_listing_scope(&storage, &auth, caller, &selectors).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_blank_cost_type_means_no_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let mut project = Project::new("Website");
        let caller = viewer_on(&storage, &mut project);
        storage.projects.upsert(project).unwrap();
        storage
            .cost_types
            .upsert(CostType::new("Labor", "hour", "hours", Money::from_cents(100)))
            .unwrap();

        let auth = MembershipAuthorizer::new(&storage);
        let selectors = ScopeSelectors {
            project: Some("Website".into()),
            cost_type: Some("  ".into()),
            ..Default::default()
        };
        let scope = resolve_listing_scope(&storage, &auth, caller, &selectors).unwrap();
        assert!(scope.cost_type.is_none());
    }

    #[test]
    fn test_caller_without_view_is_forbidden() {
        let (_temp_dir, storage) = create_test_storage();
        let project = Project::new("Website");
        storage.projects.upsert(project).unwrap();
        let outsider = User::new("outsider", "Outsider");
        storage.users.upsert(outsider.clone()).unwrap();

        let auth = MembershipAuthorizer::new(&storage);
        let selectors = ScopeSelectors {
            project: Some("Website".into()),
            ..Default::default()
        };
        let err = resolve_listing_scope(&storage, &auth, outsider.id, &selectors).unwrap_err();
        assert!(err.is_forbidden());

        // Also forbidden globally when the caller can view nowhere.
        let err =
            resolve_listing_scope(&storage, &auth, outsider.id, &ScopeSelectors::default())
                .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_entry_scope_requires_some_selector() {
        let (_temp_dir, storage) = create_test_storage();
        let err = resolve_entry_scope(&storage, &EntrySelectors::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_entry_scope_from_project() {
        let (_temp_dir, storage) = create_test_storage();
        let project = Project::new("Website");
        storage.projects.upsert(project.clone()).unwrap();

        let selectors = EntrySelectors {
            project: Some("Website".into()),
            ..Default::default()
        };
        let scope = resolve_entry_scope(&storage, &selectors).unwrap();
        assert!(scope.entry.is_none());
        assert_eq!(scope.project.id, project.id);
    }

    #[test]
    fn test_listing_key_distinguishes_contexts() {
        let project = Project::new("Website");
        let issue = crate::models::Issue::new(project.id, "Crash", "Defect");

        let global = ScopeContext::default();
        assert_eq!(global.listing_key(), "global");

        let project_scope = ScopeContext {
            project: Some(project.clone()),
            ..Default::default()
        };
        assert!(project_scope.listing_key().starts_with("project:"));

        let issue_scope = ScopeContext {
            project: Some(project),
            issue: Some(issue),
            ..Default::default()
        };
        assert!(issue_scope.listing_key().starts_with("issue:"));
    }
}
