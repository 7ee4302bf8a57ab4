//! Core data models for costlog
//!
//! Strongly-typed IDs, the money type, and the domain records: projects,
//! issues, users, cost types and cost entries.

pub mod cost_type;
pub mod entry;
pub mod ids;
pub mod issue;
pub mod money;
pub mod project;
pub mod user;

pub use cost_type::{format_units, CostType};
pub use entry::CostEntry;
pub use ids::{CostEntryId, CostTypeId, IssueId, ProjectId, UserId};
pub use issue::Issue;
pub use money::Money;
pub use project::{Membership, Permission, Project};
pub use user::User;
