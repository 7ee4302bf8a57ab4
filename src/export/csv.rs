//! CSV export of cost entries
//!
//! One row per entry with a stable header and column order. Quoting and
//! delimiting follow the csv crate's defaults, so values containing commas
//! or quotes survive a round trip through spreadsheet tools.

use std::io::Write;

use crate::error::CostlogResult;
use crate::report::row::{EntryRow, IssueRef};

/// Suggested filename for the export stream
pub const EXPORT_FILENAME: &str = "costlog.csv";

/// Column order of the export; pinned, consumers rely on it
pub const EXPORT_HEADERS: [&str; 8] = [
    "date",
    "user",
    "project",
    "issue",
    "cost_type",
    "units",
    "costs",
    "comment",
];

/// Write rows as CSV with a header line. Returns the number of data rows.
pub fn write_entries<W: Write>(rows: &[EntryRow], writer: W) -> CostlogResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;

    for row in rows {
        csv_writer.write_record(&[
            row.entry.spent_on.format("%Y-%m-%d").to_string(),
            row.user_name.clone(),
            row.project_name.clone(),
            issue_cell(&row.issue),
            row.cost_type_name.clone(),
            crate::models::format_units(row.entry.units),
            row.entry.costs.decimal_string(),
            row.entry.comment.clone(),
        ])?;
    }

    csv_writer.flush().map_err(crate::error::CostlogError::from)?;
    Ok(rows.len())
}

/// Render the issue column. The export eagerly loads assignee and
/// priority; when present they are appended to the issue reference.
fn issue_cell(issue: &Option<IssueRef>) -> String {
    let issue = match issue {
        Some(issue) => issue,
        None => return String::new(),
    };

    let mut cell = format!("{} {}: {}", issue.tracker, issue.id, issue.subject);

    let mut extras = Vec::new();
    if let Some(assignee) = &issue.assignee {
        extras.push(format!("assigned to {}", assignee));
    }
    if let Some(priority) = &issue.priority {
        extras.push(format!("priority {}", priority));
    }
    if !extras.is_empty() {
        cell.push_str(&format!(" ({})", extras.join(", ")));
    }

    cell
}
