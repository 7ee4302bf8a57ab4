//! Report generation for cost entries
//!
//! One query specification, three renderings: interactive paged view,
//! capped newest-first feed, and full CSV export.

pub mod engine;
pub mod row;

pub use engine::{FeedItem, PagedReport, Paginator, ReportEngine};
pub use row::{build_rows, sort_rows, EntryRow, IssueRef, RowContext};
