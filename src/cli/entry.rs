//! Entry mutation CLI commands
//!
//! Implements `log` (create), `edit` and `delete`. On success the command
//! prints a notice and re-renders the listing for the entry's project, the
//! command-line counterpart of redirecting back to the listing context.

use chrono::NaiveDate;
use clap::Args;

use crate::auth::MembershipAuthorizer;
use crate::config::{CostlogPaths, Settings};
use crate::error::{CostlogError, CostlogResult};
use crate::models::{CostEntry, User};
use crate::query::scope::{resolve_entry_scope, EntrySelectors};
use crate::services::{EntryEditor, EntryPayload};
use crate::storage::Storage;

use super::report::{handle_report, ReportArgs};

/// Attribute options shared by log and edit
#[derive(Debug, Args)]
pub struct EntryAttrs {
    /// Entry date (YYYY-MM-DD); defaults to today on create
    #[arg(short, long)]
    pub date: Option<String>,

    /// Number of units spent
    #[arg(short = 'n', long)]
    pub units: Option<f64>,

    /// Cost type name or ID; defaults to the system default on create
    #[arg(short = 't', long = "cost-type")]
    pub cost_type: Option<String>,

    /// Login of the entry's owner, when booking for someone else
    #[arg(long = "for")]
    pub owner: Option<String>,

    /// Free-text comment
    #[arg(short, long)]
    pub comment: Option<String>,
}

/// Options for creating an entry
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Project name or ID to book against
    #[arg(short, long)]
    pub project: Option<String>,

    /// Issue subject or ID to book against (implies its project)
    #[arg(short, long)]
    pub issue: Option<String>,

    #[command(flatten)]
    pub attrs: EntryAttrs,
}

/// Options for editing an entry
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Entry ID
    pub id: String,

    /// Move the entry to this issue (must belong to the same project)
    #[arg(short, long)]
    pub issue: Option<String>,

    #[command(flatten)]
    pub attrs: EntryAttrs,
}

/// Options for deleting an entry
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Entry ID
    pub id: String,
}

fn parse_date(value: &str) -> CostlogResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CostlogError::Validation(format!("Invalid date '{}'; use YYYY-MM-DD", value))
    })
}

/// Build a payload from the attribute options, resolving names to IDs
fn build_payload(
    storage: &Storage,
    attrs: &EntryAttrs,
    issue: Option<&str>,
) -> CostlogResult<EntryPayload> {
    let mut payload = EntryPayload::default();

    if let Some(date) = &attrs.date {
        payload.spent_on = Some(parse_date(date)?);
    }
    payload.units = attrs.units;
    payload.comment = attrs.comment.clone();

    if let Some(cost_type_ident) = attrs.cost_type.as_deref().filter(|s| !s.trim().is_empty()) {
        let cost_type = storage
            .cost_types
            .find(cost_type_ident)?
            .ok_or_else(|| CostlogError::cost_type_not_found(cost_type_ident))?;
        payload.cost_type_id = Some(cost_type.id);
    }

    if let Some(owner_login) = attrs.owner.as_deref().filter(|s| !s.trim().is_empty()) {
        // A named owner that does not resolve is refused the same way as
        // one without the book-costs capability.
        let owner = storage.users.find(owner_login)?.ok_or_else(|| {
            CostlogError::Forbidden("named owner may not book costs on this project".into())
        })?;
        payload.user_id = Some(owner.id);
    }

    if let Some(issue_ident) = issue.filter(|s| !s.trim().is_empty()) {
        let issue = storage
            .issues
            .find(issue_ident)?
            .ok_or_else(|| CostlogError::issue_not_found(issue_ident))?;
        payload.issue_id = Some(issue.id);
    }

    Ok(payload)
}

/// Re-render the listing for the entry's project after a mutation
fn redirect_to_listing(
    storage: &Storage,
    settings: &Settings,
    paths: &CostlogPaths,
    caller: &User,
    entry: &CostEntry,
) -> CostlogResult<()> {
    let project = match storage.projects.get(entry.project_id)? {
        Some(project) => project,
        None => return Ok(()),
    };

    let args = ReportArgs {
        listing: super::report::ListingArgs {
            project: Some(project.name),
            issue: None,
            cost_type: None,
            period_type: None,
            period: None,
            from: None,
            to: None,
        },
        sort: None,
        desc: false,
        asc: false,
        page: 1,
        per_page: None,
    };
    handle_report(storage, settings, paths, caller, &args)
}

/// Handle the log (create) command
pub fn handle_log(
    storage: &Storage,
    settings: &Settings,
    paths: &CostlogPaths,
    caller: &User,
    args: &LogArgs,
) -> CostlogResult<()> {
    let selectors = EntrySelectors {
        entry: None,
        issue: args.issue.clone(),
        project: args.project.clone(),
    };
    let scope = resolve_entry_scope(storage, &selectors)?;

    let payload = build_payload(storage, &args.attrs, None)?;

    let authorizer = MembershipAuthorizer::new(storage);
    let editor = EntryEditor::new(storage, &authorizer);
    let today = chrono::Local::now().date_naive();
    let entry = editor.create(caller.id, &scope, payload, today)?;

    println!("Cost entry {} created.", entry.id);
    redirect_to_listing(storage, settings, paths, caller, &entry)
}

/// Handle the edit command
pub fn handle_edit(
    storage: &Storage,
    settings: &Settings,
    paths: &CostlogPaths,
    caller: &User,
    args: &EditArgs,
) -> CostlogResult<()> {
    let existing = storage
        .entries
        .find(&args.id)?
        .ok_or_else(|| CostlogError::entry_not_found(&args.id))?;

    let payload = build_payload(storage, &args.attrs, args.issue.as_deref())?;

    let authorizer = MembershipAuthorizer::new(storage);
    let editor = EntryEditor::new(storage, &authorizer);
    let entry = editor.update(caller.id, existing.id, payload)?;

    println!("Cost entry {} updated.", entry.id);
    redirect_to_listing(storage, settings, paths, caller, &entry)
}

/// Handle the delete command
pub fn handle_delete(
    storage: &Storage,
    settings: &Settings,
    paths: &CostlogPaths,
    caller: &User,
    args: &DeleteArgs,
) -> CostlogResult<()> {
    let existing = storage
        .entries
        .find(&args.id)?
        .ok_or_else(|| CostlogError::entry_not_found(&args.id))?;

    let authorizer = MembershipAuthorizer::new(storage);
    let editor = EntryEditor::new(storage, &authorizer);
    let entry = editor.delete(caller.id, existing.id)?;

    println!("Cost entry {} deleted.", entry.id);
    redirect_to_listing(storage, settings, paths, caller, &entry)
}
