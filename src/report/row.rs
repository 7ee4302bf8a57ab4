//! Joined row shapes for report output
//!
//! Each output format works on rows joined with their display context:
//! project, user and cost type names, and the related issue. The export
//! format asks for the fullest context, which additionally carries the
//! issue's assignee and priority.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::CostlogResult;
use crate::models::{format_units, CostEntry, IssueId};
use crate::query::sort::{SortKey, SortState};
use crate::storage::Storage;

/// How much related context to join onto each row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowContext {
    /// Project, cost type, user, issue and tracker
    Display,
    /// Display context plus the issue's assignee and priority
    Export,
}

/// Display context of an entry's related issue
#[derive(Debug, Clone)]
pub struct IssueRef {
    pub id: IssueId,
    pub subject: String,
    pub tracker: String,
    pub assignee: Option<String>,
    pub priority: Option<String>,
}

/// A cost entry joined with its display context
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub entry: CostEntry,
    pub project_name: String,
    pub user_name: String,
    pub cost_type_name: String,
    /// Human unit label for the entry's unit count ("2.5 hours")
    pub unit_label: String,
    pub issue: Option<IssueRef>,
}

/// Join entries with their display context.
///
/// Referents that no longer resolve render as "Unknown" rather than
/// failing the whole listing.
pub fn build_rows(
    storage: &Storage,
    entries: Vec<CostEntry>,
    context: RowContext,
) -> CostlogResult<Vec<EntryRow>> {
    let project_names: HashMap<_, _> = storage
        .projects
        .get_all()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let users: HashMap<_, _> = storage
        .users
        .get_all()?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();
    let cost_types: HashMap<_, _> = storage
        .cost_types
        .get_all()?
        .into_iter()
        .map(|ct| (ct.id, ct))
        .collect();

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        let project_name = project_names
            .get(&entry.project_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let user_name = users
            .get(&entry.user_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        let (cost_type_name, unit_label) = match cost_types.get(&entry.cost_type_id) {
            Some(ct) => (ct.name.clone(), ct.unit_label(entry.units)),
            None => ("Unknown".to_string(), format_units(entry.units)),
        };

        let issue = match entry.issue_id {
            Some(issue_id) => storage.issues.get(issue_id)?.map(|issue| {
                let (assignee, priority) = match context {
                    RowContext::Display => (None, None),
                    RowContext::Export => {
                        let assignee = issue
                            .assignee
                            .and_then(|user_id| users.get(&user_id).cloned());
                        (assignee, issue.priority.clone())
                    }
                };
                IssueRef {
                    id: issue.id,
                    subject: issue.subject,
                    tracker: issue.tracker,
                    assignee,
                    priority,
                }
            }),
            None => None,
        };

        rows.push(EntryRow {
            entry,
            project_name,
            user_name,
            cost_type_name,
            unit_label,
            issue,
        });
    }

    Ok(rows)
}

/// Sort rows by the active sort key.
///
/// Name-based keys compare the joined display names; the sort is stable, so
/// ties keep the engine's deterministic base order.
pub fn sort_rows(rows: &mut [EntryRow], sort: SortState) {
    rows.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::SpentOn => a.entry.spent_on.cmp(&b.entry.spent_on),
            SortKey::User => a.user_name.cmp(&b.user_name),
            SortKey::Project => a.project_name.cmp(&b.project_name),
            SortKey::Issue => issue_sort_key(a).cmp(&issue_sort_key(b)),
            SortKey::CostType => a.cost_type_name.cmp(&b.cost_type_name),
            SortKey::Units => a
                .entry
                .units
                .partial_cmp(&b.entry.units)
                .unwrap_or(Ordering::Equal),
            SortKey::Costs => a.entry.costs.cmp(&b.entry.costs),
        };
        if sort.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn issue_sort_key(row: &EntryRow) -> Option<String> {
    row.issue
        .as_ref()
        .map(|issue| format!("{} {}", issue.tracker, issue.subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CostlogPaths;
    use crate::models::{CostType, Issue, Money, Project, User};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) -> (Project, User, CostType, Issue) {
        let project = Project::new("Website");
        let user = User::new("jsmith", "Jay Smith");
        let cost_type = CostType::new("Labor", "hour", "hours", Money::from_cents(7500));
        let mut issue = Issue::new(project.id, "Crash on save", "Defect");
        issue.assignee = Some(user.id);
        issue.priority = Some("High".to_string());

        storage.projects.upsert(project.clone()).unwrap();
        storage.users.upsert(user.clone()).unwrap();
        storage.cost_types.upsert(cost_type.clone()).unwrap();
        storage.issues.upsert(issue.clone()).unwrap();
        (project, user, cost_type, issue)
    }

    fn entry(
        project: &Project,
        user: &User,
        cost_type: &CostType,
        issue: Option<&Issue>,
        units: f64,
    ) -> CostEntry {
        let mut e = CostEntry::new(
            project.id,
            issue.map(|i| i.id),
            user.id,
            cost_type.id,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        e.units = units;
        e.costs = cost_type.cost_for(units);
        e
    }

    #[test]
    fn test_display_context_omits_assignee_and_priority() {
        let (_temp_dir, storage) = create_test_storage();
        let (project, user, cost_type, issue) = seed(&storage);
        let e = entry(&project, &user, &cost_type, Some(&issue), 2.5);

        let rows = build_rows(&storage, vec![e], RowContext::Display).unwrap();
        let row = &rows[0];
        assert_eq!(row.project_name, "Website");
        assert_eq!(row.user_name, "Jay Smith");
        assert_eq!(row.cost_type_name, "Labor");
        assert_eq!(row.unit_label, "2.5 hours");

        let issue_ref = row.issue.as_ref().unwrap();
        assert_eq!(issue_ref.tracker, "Defect");
        assert!(issue_ref.assignee.is_none());
        assert!(issue_ref.priority.is_none());
    }

    #[test]
    fn test_export_context_includes_assignee_and_priority() {
        let (_temp_dir, storage) = create_test_storage();
        let (project, user, cost_type, issue) = seed(&storage);
        let e = entry(&project, &user, &cost_type, Some(&issue), 1.0);

        let rows = build_rows(&storage, vec![e], RowContext::Export).unwrap();
        let issue_ref = rows[0].issue.as_ref().unwrap();
        assert_eq!(issue_ref.assignee.as_deref(), Some("Jay Smith"));
        assert_eq!(issue_ref.priority.as_deref(), Some("High"));
    }

    #[test]
    fn test_missing_referents_render_unknown() {
        let (_temp_dir, storage) = create_test_storage();
        let project = Project::new("Website");
        let cost_type = CostType::new("Labor", "hour", "hours", Money::from_cents(100));
        // Neither the project nor the user nor the cost type is stored.
        let user = User::new("ghost", "Ghost");
        let e = entry(&project, &user, &cost_type, None, 1.0);

        let rows = build_rows(&storage, vec![e], RowContext::Display).unwrap();
        assert_eq!(rows[0].project_name, "Unknown");
        assert_eq!(rows[0].user_name, "Unknown");
        assert_eq!(rows[0].cost_type_name, "Unknown");
    }

    #[test]
    fn test_sort_rows_by_units_and_direction() {
        let (_temp_dir, storage) = create_test_storage();
        let (project, user, cost_type, _issue) = seed(&storage);

        let entries = vec![
            entry(&project, &user, &cost_type, None, 3.0),
            entry(&project, &user, &cost_type, None, 1.0),
            entry(&project, &user, &cost_type, None, 2.0),
        ];
        let mut rows = build_rows(&storage, entries, RowContext::Display).unwrap();

        sort_rows(
            &mut rows,
            SortState {
                key: SortKey::Units,
                descending: false,
            },
        );
        let units: Vec<f64> = rows.iter().map(|r| r.entry.units).collect();
        assert_eq!(units, vec![1.0, 2.0, 3.0]);

        sort_rows(
            &mut rows,
            SortState {
                key: SortKey::Units,
                descending: true,
            },
        );
        let units: Vec<f64> = rows.iter().map(|r| r.entry.units).collect();
        assert_eq!(units, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_sort_rows_by_user_name() {
        let (_temp_dir, storage) = create_test_storage();
        let (project, _user, cost_type, _issue) = seed(&storage);

        let alice = User::new("alice", "Alice");
        let bob = User::new("bob", "Bob");
        storage.users.upsert(alice.clone()).unwrap();
        storage.users.upsert(bob.clone()).unwrap();

        let entries = vec![
            entry(&project, &bob, &cost_type, None, 1.0),
            entry(&project, &alice, &cost_type, None, 1.0),
        ];
        let mut rows = build_rows(&storage, entries, RowContext::Display).unwrap();
        sort_rows(
            &mut rows,
            SortState {
                key: SortKey::User,
                descending: false,
            },
        );
        assert_eq!(rows[0].user_name, "Alice");
        assert_eq!(rows[1].user_name, "Bob");
    }

    #[test]
    fn test_entries_without_issue_sort_first() {
        let (_temp_dir, storage) = create_test_storage();
        let (project, user, cost_type, issue) = seed(&storage);

        let entries = vec![
            entry(&project, &user, &cost_type, Some(&issue), 1.0),
            entry(&project, &user, &cost_type, None, 2.0),
        ];
        let mut rows = build_rows(&storage, entries, RowContext::Display).unwrap();
        sort_rows(
            &mut rows,
            SortState {
                key: SortKey::Issue,
                descending: false,
            },
        );
        assert!(rows[0].issue.is_none());
        assert!(rows[1].issue.is_some());
    }
}
