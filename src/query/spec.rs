//! Query specification
//!
//! Composes the visibility predicate with the explicit filters into the one
//! value handed to the storage backend: which entries are in scope, the
//! cost-type equality filter, the mandatory date range, and the sort.

use std::collections::BTreeSet;

use crate::auth::Authorizer;
use crate::error::CostlogResult;
use crate::models::{CostEntry, CostTypeId, IssueId, ProjectId, UserId};
use crate::storage::Storage;

use super::date_range::DateRange;
use super::scope::ScopeContext;
use super::sort::SortState;

/// The authorization-derived subset of entries a caller may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Entries within any of these projects
    Projects(BTreeSet<ProjectId>),
    /// Entries attached to exactly this issue
    Issue(IssueId),
}

/// The composed query handed to the storage backend
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub visibility: Visibility,
    pub cost_type: Option<CostTypeId>,
    pub range: DateRange,
    pub sort: SortState,
}

impl QuerySpec {
    /// Whether an entry satisfies the non-visibility filters
    pub fn filters_match(&self, entry: &CostEntry) -> bool {
        if let Some(cost_type_id) = self.cost_type {
            if entry.cost_type_id != cost_type_id {
                return false;
            }
        }
        entry.spent_on >= self.range.from && entry.spent_on <= self.range.to
    }
}

/// Build the visibility predicate for a resolved scope.
///
/// - No project in scope: every project where the caller holds
///   view-cost-entries.
/// - Project without issue: that project, plus its subproject tree when
///   subproject inclusion is enabled.
/// - Issue: exactly that issue (the project context is implied).
pub fn build_visibility<A: Authorizer>(
    storage: &Storage,
    authorizer: &A,
    caller: UserId,
    scope: &ScopeContext,
    include_subprojects: bool,
) -> CostlogResult<Visibility> {
    if let Some(issue) = &scope.issue {
        return Ok(Visibility::Issue(issue.id));
    }

    if let Some(project) = &scope.project {
        let ids = if include_subprojects {
            storage.projects.subtree(project.id)?
        } else {
            [project.id].into_iter().collect()
        };
        return Ok(Visibility::Projects(ids));
    }

    Ok(Visibility::Projects(authorizer.viewable_projects(caller)?))
}

/// Compose the full query specification for a resolved scope
pub fn build_spec<A: Authorizer>(
    storage: &Storage,
    authorizer: &A,
    caller: UserId,
    scope: &ScopeContext,
    include_subprojects: bool,
    range: DateRange,
    sort: SortState,
) -> CostlogResult<QuerySpec> {
    Ok(QuerySpec {
        visibility: build_visibility(storage, authorizer, caller, scope, include_subprojects)?,
        cost_type: scope.cost_type.as_ref().map(|ct| ct.id),
        range,
        sort,
    })
}
