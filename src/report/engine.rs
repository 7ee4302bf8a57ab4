//! Report engine
//!
//! Runs one query specification against the storage backend and renders the
//! logical result set in three shapes: a paginated page of rows for the
//! interactive view, a capped newest-first feed, and a full unpaginated
//! CSV export. The formats differ only in eagerness and limits; the
//! filtering is shared.

use std::io::Write;

use chrono::NaiveDate;

use crate::auth::Authorizer;
use crate::config::settings::Settings;
use crate::error::{CostlogError, CostlogResult};
use crate::export::csv::write_entries;
use crate::models::{CostEntry, UserId};
use crate::query::date_range::{self, DateRange, PeriodParams, SpentOnBounds};
use crate::query::spec::{QuerySpec, Visibility};
use crate::storage::Storage;

use super::row::{build_rows, sort_rows, EntryRow, RowContext};

/// Page window arithmetic with clamping
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total: usize,
    per_page: usize,
}

impl Paginator {
    pub fn new(total: usize, per_page: usize) -> Self {
        Self { total, per_page }
    }

    /// Number of pages; an empty result set still has one (empty) page
    pub fn page_count(&self) -> usize {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    /// Clamp a requested page number into the valid range
    pub fn clamp(&self, requested: usize) -> usize {
        requested.max(1).min(self.page_count())
    }

    /// Row offset of a (clamped) page
    pub fn offset(&self, page: usize) -> usize {
        (page - 1) * self.per_page
    }
}

/// One page of the interactive listing
#[derive(Debug)]
pub struct PagedReport {
    /// Total number of matching rows across all pages
    pub total: usize,
    /// The (clamped) page these rows belong to
    pub page: usize,
    pub page_count: usize,
    pub per_page: usize,
    /// The date range the listing was resolved against
    pub range: DateRange,
    pub rows: Vec<EntryRow>,
}

/// One entry of the syndication feed
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub content: String,
    pub author: String,
    pub published: chrono::DateTime<chrono::Utc>,
}

/// Orchestrates scope, filters and sorting into the three output formats
pub struct ReportEngine<'a, A: Authorizer> {
    storage: &'a Storage,
    authorizer: &'a A,
    settings: &'a Settings,
}

impl<'a, A: Authorizer> ReportEngine<'a, A> {
    pub fn new(storage: &'a Storage, authorizer: &'a A, settings: &'a Settings) -> Self {
        Self {
            storage,
            authorizer,
            settings,
        }
    }

    /// Resolve the request's period parameters into a concrete date range.
    ///
    /// Default bounds come from the earliest/latest `spent_on` across all
    /// entries visible to the caller, independent of the narrower listing
    /// scope.
    pub fn resolve_date_range(
        &self,
        caller: UserId,
        params: &PeriodParams,
        today: NaiveDate,
    ) -> CostlogResult<DateRange> {
        let viewable = self.authorizer.viewable_projects(caller)?;
        let (min, max) = self.storage.entries.spent_on_bounds(&viewable)?;
        Ok(date_range::resolve(
            params,
            today,
            self.settings.first_day_of_week,
            SpentOnBounds { min, max },
        ))
    }

    /// All entries matching the spec, in a deterministic base order
    fn matching_entries(&self, spec: &QuerySpec) -> CostlogResult<Vec<CostEntry>> {
        let mut entries = match &spec.visibility {
            Visibility::Issue(issue_id) => self.storage.entries.get_by_issue(*issue_id)?,
            Visibility::Projects(project_ids) => {
                self.storage.entries.get_by_projects(project_ids)?
            }
        };
        entries.retain(|e| spec.filters_match(e));
        entries.sort_by(|a, b| {
            b.spent_on
                .cmp(&a.spent_on)
                .then(b.created_on.cmp(&a.created_on))
                .then(a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    /// The interactive paged view: count, clamp, fetch one page with full
    /// display context
    pub fn paged(
        &self,
        spec: &QuerySpec,
        requested_page: usize,
        per_page_override: Option<usize>,
    ) -> CostlogResult<PagedReport> {
        let per_page = per_page_override.unwrap_or(self.settings.per_page);
        if per_page == 0 {
            return Err(CostlogError::Validation("per_page must be positive".into()));
        }

        let entries = self.matching_entries(spec)?;
        let total = entries.len();
        let paginator = Paginator::new(total, per_page);
        let page = paginator.clamp(requested_page);

        let mut rows = build_rows(self.storage, entries, RowContext::Display)?;
        sort_rows(&mut rows, spec.sort);

        let offset = paginator.offset(page);
        let rows: Vec<EntryRow> = rows.into_iter().skip(offset).take(per_page).collect();

        Ok(PagedReport {
            total,
            page,
            page_count: paginator.page_count(),
            per_page,
            range: spec.range,
            rows,
        })
    }

    /// The syndication feed: the most recently created entries, newest
    /// first, capped at the configured feed limit. The active sort key
    /// does not apply here.
    pub fn feed(&self, spec: &QuerySpec) -> CostlogResult<Vec<FeedItem>> {
        let mut entries = self.matching_entries(spec)?;
        entries.sort_by(|a, b| b.created_on.cmp(&a.created_on));
        entries.truncate(self.settings.feed_limit);

        let rows = build_rows(self.storage, entries, RowContext::Display)?;
        Ok(rows.iter().map(feed_item).collect())
    }

    /// The bulk export: every matching row, active sort order, fullest
    /// context, streamed as CSV. Returns the number of data rows written.
    pub fn export<W: Write>(&self, spec: &QuerySpec, writer: W) -> CostlogResult<usize> {
        let entries = self.matching_entries(spec)?;
        let mut rows = build_rows(self.storage, entries, RowContext::Export)?;
        sort_rows(&mut rows, spec.sort);
        write_entries(&rows, writer)
    }
}

fn feed_item(row: &EntryRow) -> FeedItem {
    let title = format!(
        "{}: {} ({})",
        row.cost_type_name, row.unit_label, row.project_name
    );

    let mut content = format!(
        "{} booked by {} on {}",
        row.unit_label, row.user_name, row.entry.spent_on
    );
    if let Some(issue) = &row.issue {
        content.push_str(&format!(" for {} {}: {}", issue.tracker, issue.id, issue.subject));
    }
    if !row.entry.comment.is_empty() {
        content.push_str(&format!(" ({})", row.entry.comment));
    }

    FeedItem {
        title,
        content,
        author: row.user_name.clone(),
        published: row.entry.created_on,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MembershipAuthorizer;
    use crate::config::paths::CostlogPaths;
    use crate::models::{CostType, Money, Permission, Project, User};
    use crate::query::sort::{SortKey, SortState};
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    struct Fixture {
        project: Project,
        user: User,
        cost_type: CostType,
    }

    fn seed(storage: &Storage) -> Fixture {
        let user = User::new("jsmith", "Jay Smith");
        let mut project = Project::new("Website");
        project.add_member(user.id, vec![Permission::ViewCostEntries]);
        let cost_type = CostType::new("Labor", "hour", "hours", Money::from_cents(7500));

        storage.users.upsert(user.clone()).unwrap();
        storage.projects.upsert(project.clone()).unwrap();
        storage.cost_types.upsert(cost_type.clone()).unwrap();

        Fixture {
            project,
            user,
            cost_type,
        }
    }

    fn add_entries(storage: &Storage, fixture: &Fixture, count: usize) {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        for i in 0..count {
            let mut entry = CostEntry::new(
                fixture.project.id,
                None,
                fixture.user.id,
                fixture.cost_type.id,
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days((i % 28) as i64),
            );
            entry.units = (i + 1) as f64;
            entry.costs = fixture.cost_type.cost_for(entry.units);
            entry.created_on = base + Duration::minutes(i as i64);
            storage.entries.upsert(entry).unwrap();
        }
    }

    fn spec_for(fixture: &Fixture, sort: SortState) -> QuerySpec {
        let projects: BTreeSet<_> = [fixture.project.id].into_iter().collect();
        QuerySpec {
            visibility: Visibility::Projects(projects),
            cost_type: None,
            range: DateRange {
                from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                to: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                freeform: false,
            },
            sort,
        }
    }

    #[test]
    fn test_paginator_clamps_out_of_range_pages() {
        let paginator = Paginator::new(60, 25);
        assert_eq!(paginator.page_count(), 3);
        assert_eq!(paginator.clamp(99), 3);
        assert_eq!(paginator.clamp(0), 1);
        assert_eq!(paginator.clamp(2), 2);
        assert_eq!(paginator.offset(2), 25);
    }

    #[test]
    fn test_paginator_empty_result_has_one_page() {
        let paginator = Paginator::new(0, 25);
        assert_eq!(paginator.page_count(), 1);
        assert_eq!(paginator.clamp(5), 1);
    }

    #[test]
    fn test_paged_report_with_60_entries() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);
        add_entries(&storage, &fixture, 60);

        let settings = Settings::default();
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);
        let spec = spec_for(&fixture, SortState::default());

        let report = engine.paged(&spec, 1, Some(25)).unwrap();
        assert_eq!(report.total, 60);
        assert_eq!(report.page_count, 3);
        assert_eq!(report.rows.len(), 25);

        // Page 99 clamps to the last page, which holds the remainder.
        let report = engine.paged(&spec, 99, Some(25)).unwrap();
        assert_eq!(report.page, 3);
        assert_eq!(report.rows.len(), 10);
    }

    #[test]
    fn test_paged_default_sort_is_spent_on_descending() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);
        add_entries(&storage, &fixture, 10);

        let settings = Settings::default();
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);
        let spec = spec_for(&fixture, SortState::default());

        let report = engine.paged(&spec, 1, None).unwrap();
        let dates: Vec<_> = report.rows.iter().map(|r| r.entry.spent_on).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_feed_is_capped_and_newest_first_regardless_of_sort() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);
        add_entries(&storage, &fixture, 40);

        let mut settings = Settings::default();
        settings.feed_limit = 15;
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);

        // Active sort is by units; the feed must ignore it.
        let spec = spec_for(
            &fixture,
            SortState {
                key: SortKey::Units,
                descending: false,
            },
        );

        let items = engine.feed(&spec).unwrap();
        assert_eq!(items.len(), 15);
        for pair in items.windows(2) {
            assert!(pair[0].published >= pair[1].published);
        }
    }

    #[test]
    fn test_export_includes_all_matching_rows() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);
        add_entries(&storage, &fixture, 60);

        let settings = Settings::default();
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);
        let spec = spec_for(&fixture, SortState::default());

        let mut out = Vec::new();
        let written = engine.export(&spec, &mut out).unwrap();
        assert_eq!(written, 60);

        let text = String::from_utf8(out).unwrap();
        // Header plus one line per entry.
        assert_eq!(text.lines().count(), 61);
        assert!(text.starts_with("date,user,project,issue,cost_type,units,costs,comment"));
    }

    #[test]
    fn test_date_range_filter_applies() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);
        add_entries(&storage, &fixture, 10); // spent_on 2024-03-01 .. 2024-03-10

        let settings = Settings::default();
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);

        let mut spec = spec_for(&fixture, SortState::default());
        spec.range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            freeform: false,
        };

        let report = engine.paged(&spec, 1, None).unwrap();
        assert_eq!(report.total, 3);
    }

    #[test]
    fn test_resolve_date_range_uses_visible_bounds() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);
        add_entries(&storage, &fixture, 5); // 2024-03-01 .. 2024-03-05

        let settings = Settings::default();
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let range = engine
            .resolve_date_range(fixture.user.id, &PeriodParams::default(), today)
            .unwrap();
        // Lower default bound is one day before the earliest visible entry.
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(range.to, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_resolve_date_range_with_no_entries() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);

        let settings = Settings::default();
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);

        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let range = engine
            .resolve_date_range(fixture.user.id, &PeriodParams::default(), today)
            .unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert_eq!(range.to, today);
    }

    #[test]
    fn test_per_page_zero_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let fixture = seed(&storage);

        let settings = Settings::default();
        let auth = MembershipAuthorizer::new(&storage);
        let engine = ReportEngine::new(&storage, &auth, &settings);
        let spec = spec_for(&fixture, SortState::default());

        let err = engine.paged(&spec, 1, Some(0)).unwrap_err();
        assert!(err.is_validation());
    }
}
