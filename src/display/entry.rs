//! Cost entry display formatting
//!
//! Formats paged reports, feed items and entry details for terminal
//! display.

use crate::models::format_units;
use crate::report::engine::{FeedItem, PagedReport};
use crate::report::row::EntryRow;

/// Format a single row of the interactive listing
pub fn format_entry_row(row: &EntryRow) -> String {
    let issue_display = match &row.issue {
        Some(issue) => format!("{} {}", issue.tracker, issue.id),
        None => String::new(),
    };

    format!(
        "{} {:10} {:14} {:16} {:14} {:12} {:>8} {:>10}  {}",
        row.entry.id,
        row.entry.spent_on.format("%Y-%m-%d"),
        truncate(&row.user_name, 14),
        truncate(&row.project_name, 16),
        truncate(&issue_display, 14),
        truncate(&row.cost_type_name, 12),
        format_units(row.entry.units),
        row.entry.costs.to_string(),
        row.entry.comment
    )
}

/// Format a paged report with its summary line
pub fn format_paged_report(report: &PagedReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{} entries from {} to {} (page {} of {})\n",
        report.total, report.range.from, report.range.to, report.page, report.page_count
    ));

    if report.rows.is_empty() {
        output.push_str("No cost entries found.\n");
        return output;
    }

    output.push_str(&format!(
        "{:11} {:10} {:14} {:16} {:14} {:12} {:>8} {:>10}  {}\n",
        "ID", "Date", "User", "Project", "Issue", "Cost type", "Units", "Costs", "Comment"
    ));
    output.push_str(&"-".repeat(110));
    output.push('\n');

    for row in &report.rows {
        output.push_str(&format_entry_row(row));
        output.push('\n');
    }

    output
}

/// Format feed items, newest first
pub fn format_feed(items: &[FeedItem]) -> String {
    if items.is_empty() {
        return "No recent cost entries.\n".to_string();
    }

    let mut output = String::new();
    for item in items {
        output.push_str(&format!(
            "{}  {}\n    {}\n",
            item.published.format("%Y-%m-%d %H:%M"),
            item.title,
            item.content
        ));
    }
    output
}

/// Truncate a string for column display
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
