//! Query construction for cost entry listings
//!
//! Scope resolution, date range resolution, sorting and the composed
//! query specification handed to the storage backend.

pub mod date_range;
pub mod scope;
pub mod sort;
pub mod spec;

pub use date_range::{DateRange, PeriodParams, PeriodType, SpentOnBounds};
pub use scope::{EntryScope, EntrySelectors, ScopeContext, ScopeSelectors};
pub use sort::{SortKey, SortState};
pub use spec::{QuerySpec, Visibility};
