//! Cost entry model
//!
//! A cost entry is the atomic record: a unit count of some cost type spent
//! on a date against a project and optionally an issue. The cost amount is
//! derived from the units and the cost type's rate; it is never accepted
//! from a payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CostEntryId, CostTypeId, IssueId, ProjectId, UserId};
use super::money::Money;

/// A single recorded unit of cost against a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEntry {
    /// Unique identifier
    pub id: CostEntryId,

    /// The project this entry belongs to
    pub project_id: ProjectId,

    /// Optional finer-grained scope
    pub issue_id: Option<IssueId>,

    /// The user the entry is booked for
    pub user_id: UserId,

    /// The cost type defining unit and rate
    pub cost_type_id: CostTypeId,

    /// The date the cost was incurred
    pub spent_on: NaiveDate,

    /// Number of units spent
    pub units: f64,

    /// Derived cost amount (units x cost type rate)
    pub costs: Money,

    /// Free-text comment
    #[serde(default)]
    pub comment: String,

    /// When the entry was recorded
    pub created_on: DateTime<Utc>,
}

impl CostEntry {
    /// Create a new entry bound to a scope, an owner and a date
    pub fn new(
        project_id: ProjectId,
        issue_id: Option<IssueId>,
        user_id: UserId,
        cost_type_id: CostTypeId,
        spent_on: NaiveDate,
    ) -> Self {
        Self {
            id: CostEntryId::new(),
            project_id,
            issue_id,
            user_id,
            cost_type_id,
            spent_on,
            units: 0.0,
            costs: Money::zero(),
            comment: String::new(),
            created_on: Utc::now(),
        }
    }

    /// Validate domain rules for this entry
    pub fn validate(&self) -> Result<(), String> {
        if !self.units.is_finite() {
            return Err("units must be a finite number".to_string());
        }
        if self.units < 0.0 {
            return Err("units must not be negative".to_string());
        }
        Ok(())
    }
}
