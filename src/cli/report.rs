//! Listing CLI commands
//!
//! Implements the three output formats over one query specification:
//! `report` (interactive paged view), `feed` (capped newest-first) and
//! `export` (full CSV).

use std::path::PathBuf;

use clap::Args;

use crate::auth::MembershipAuthorizer;
use crate::config::{CostlogPaths, SessionState, Settings};
use crate::display::{format_feed, format_paged_report};
use crate::error::{CostlogError, CostlogResult};
use crate::export::EXPORT_FILENAME;
use crate::models::User;
use crate::query::scope::{resolve_listing_scope, ScopeSelectors};
use crate::query::sort::SortState;
use crate::query::spec::build_spec;
use crate::query::{PeriodParams, PeriodType};
use crate::report::ReportEngine;
use crate::storage::Storage;

/// Scope and date window options shared by all listing commands
#[derive(Debug, Args)]
pub struct ListingArgs {
    /// Project name or ID to scope the listing to
    #[arg(short, long)]
    pub project: Option<String>,

    /// Issue subject or ID to scope the listing to
    #[arg(short, long)]
    pub issue: Option<String>,

    /// Filter by cost type name or ID
    #[arg(short = 't', long = "cost-type")]
    pub cost_type: Option<String>,

    /// How to interpret the period options: "preset" or "freeform"
    #[arg(long = "period-type")]
    pub period_type: Option<String>,

    /// Named period preset (today, yesterday, current_week, last_week,
    /// 7_days, current_month, last_month, 30_days, current_year)
    #[arg(long)]
    pub period: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

impl ListingArgs {
    fn selectors(&self) -> ScopeSelectors {
        ScopeSelectors {
            project: self.project.clone(),
            issue: self.issue.clone(),
            cost_type: self.cost_type.clone(),
        }
    }

    fn period_params(&self) -> CostlogResult<PeriodParams> {
        let period_type = match self.period_type.as_deref() {
            None => None,
            Some("preset") => Some(PeriodType::Preset),
            Some("freeform") => Some(PeriodType::Freeform),
            Some(other) => {
                return Err(CostlogError::Validation(format!(
                    "Unknown period type '{}'; use 'preset' or 'freeform'",
                    other
                )))
            }
        };
        Ok(PeriodParams {
            period_type,
            period: self.period.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
        })
    }
}

/// Options for the paged report command
#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Sort key (spent_on, user, project, issue, cost_type, units, costs).
    /// Repeating the active key toggles the direction.
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Force descending order
    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    /// Force ascending order
    #[arg(long)]
    pub asc: bool,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the configured page size)
    #[arg(long = "per-page")]
    pub per_page: Option<usize>,
}

/// Options for the feed command
#[derive(Debug, Args)]
pub struct FeedArgs {
    #[command(flatten)]
    pub listing: ListingArgs,
}

/// Options for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Write the CSV to this file or directory instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn requested_direction(desc: bool, asc: bool) -> Option<bool> {
    if desc {
        Some(true)
    } else if asc {
        Some(false)
    } else {
        None
    }
}

/// Handle the paged report command
pub fn handle_report(
    storage: &Storage,
    settings: &Settings,
    paths: &CostlogPaths,
    caller: &User,
    args: &ReportArgs,
) -> CostlogResult<()> {
    let authorizer = MembershipAuthorizer::new(storage);
    let scope = resolve_listing_scope(storage, &authorizer, caller.id, &args.listing.selectors())?;

    // previousSort -> nextSort, persisted per listing context
    let mut session = SessionState::load_or_create(paths)?;
    let listing_key = scope.listing_key();
    let previous = session.sort_for(&listing_key);
    let sort = SortState::resolve(
        previous,
        args.sort.as_deref(),
        requested_direction(args.desc, args.asc),
    );
    session.set_sort(listing_key.clone(), sort);
    session.save(paths)?;

    let engine = ReportEngine::new(storage, &authorizer, settings);
    let today = chrono::Local::now().date_naive();
    let range = engine.resolve_date_range(caller.id, &args.listing.period_params()?, today)?;

    let spec = build_spec(
        storage,
        &authorizer,
        caller.id,
        &scope,
        settings.display_subprojects,
        range,
        sort,
    )?;

    let report = engine.paged(&spec, args.page, args.per_page)?;
    print!("{}", format_paged_report(&report));
    Ok(())
}

/// Handle the feed command
pub fn handle_feed(
    storage: &Storage,
    settings: &Settings,
    caller: &User,
    args: &FeedArgs,
) -> CostlogResult<()> {
    let authorizer = MembershipAuthorizer::new(storage);
    let scope = resolve_listing_scope(storage, &authorizer, caller.id, &args.listing.selectors())?;

    let engine = ReportEngine::new(storage, &authorizer, settings);
    let today = chrono::Local::now().date_naive();
    let range = engine.resolve_date_range(caller.id, &args.listing.period_params()?, today)?;

    // The feed always renders newest-first; the stored sort preference
    // is irrelevant here, so the default spec sort is fine.
    let spec = build_spec(
        storage,
        &authorizer,
        caller.id,
        &scope,
        settings.display_subprojects,
        range,
        SortState::default(),
    )?;

    let items = engine.feed(&spec)?;
    print!("{}", format_feed(&items));
    Ok(())
}

/// Handle the export command
pub fn handle_export(
    storage: &Storage,
    settings: &Settings,
    paths: &CostlogPaths,
    caller: &User,
    args: &ExportArgs,
) -> CostlogResult<()> {
    let authorizer = MembershipAuthorizer::new(storage);
    let scope = resolve_listing_scope(storage, &authorizer, caller.id, &args.listing.selectors())?;

    // The export honors the stored sort preference for this listing.
    let session = SessionState::load_or_create(paths)?;
    let sort = session
        .sort_for(&scope.listing_key())
        .unwrap_or_default();

    let engine = ReportEngine::new(storage, &authorizer, settings);
    let today = chrono::Local::now().date_naive();
    let range = engine.resolve_date_range(caller.id, &args.listing.period_params()?, today)?;

    let spec = build_spec(
        storage,
        &authorizer,
        caller.id,
        &scope,
        settings.display_subprojects,
        range,
        sort,
    )?;

    match &args.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(EXPORT_FILENAME)
            } else {
                path.clone()
            };
            let file = std::fs::File::create(&path)
                .map_err(|e| CostlogError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
            let written = engine.export(&spec, file)?;
            println!("Exported {} entries to {}", written, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            engine.export(&spec, stdout.lock())?;
        }
    }
    Ok(())
}
