//! Issue model
//!
//! Issues are the optional finer-grained scope for cost entries. Each issue
//! belongs to exactly one project. Assignee and priority only matter for the
//! export row shape, which eager-loads them.

use serde::{Deserialize, Serialize};

use super::ids::{IssueId, ProjectId, UserId};

/// An issue within a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier
    pub id: IssueId,

    /// The project this issue belongs to
    pub project_id: ProjectId,

    /// One-line summary
    pub subject: String,

    /// Tracker name (e.g., "Defect", "Feature")
    pub tracker: String,

    /// User the issue is assigned to, if any
    pub assignee: Option<UserId>,

    /// Priority name (e.g., "Normal", "High"), if set
    pub priority: Option<String>,
}

impl Issue {
    /// Create a new issue
    pub fn new(
        project_id: ProjectId,
        subject: impl Into<String>,
        tracker: impl Into<String>,
    ) -> Self {
        Self {
            id: IssueId::new(),
            project_id,
            subject: subject.into(),
            tracker: tracker.into(),
            assignee: None,
            priority: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_issue() {
        let project_id = ProjectId::new();
        let issue = Issue::new(project_id, "Crash on save", "Defect");
        assert_eq!(issue.project_id, project_id);
        assert_eq!(issue.subject, "Crash on save");
        assert!(issue.assignee.is_none());
    }
}
