//! Sort specification for cost entry listings
//!
//! A small whitelist of logical sort keys with a stable default. Only one
//! key is active at a time; requesting the active key again toggles its
//! direction. Resolution is a pure `previous -> next` step so it can be
//! tested without a session; the CLI persists the result per listing
//! context (see `config::session`).

use serde::{Deserialize, Serialize};

/// A sortable logical column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Entry date (the default key)
    SpentOn,
    /// Owner's display name
    User,
    /// Project display name
    Project,
    /// Associated issue
    Issue,
    /// Cost type display name
    CostType,
    /// Unit count
    Units,
    /// Derived cost amount
    Costs,
}

impl SortKey {
    /// Parse a sort key name; unknown names yield `None` (callers fall
    /// back to the default)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "spent_on" => Some(Self::SpentOn),
            "user" => Some(Self::User),
            "project" => Some(Self::Project),
            "issue" => Some(Self::Issue),
            "cost_type" => Some(Self::CostType),
            "units" => Some(Self::Units),
            "costs" => Some(Self::Costs),
            _ => None,
        }
    }

    /// The direction a key starts in when first selected
    fn default_descending(self) -> bool {
        matches!(self, Self::SpentOn)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpentOn => "spent_on",
            Self::User => "user",
            Self::Project => "project",
            Self::Issue => "issue",
            Self::CostType => "cost_type",
            Self::Units => "units",
            Self::Costs => "costs",
        }
    }
}

/// The active sort key and direction for one listing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::SpentOn,
            descending: true,
        }
    }
}

impl SortState {
    /// Resolve the next sort state from the previous one and the request.
    ///
    /// - An unknown or absent key keeps the previous state (or the default).
    /// - Requesting the already-active key toggles the direction, unless an
    ///   explicit direction was supplied.
    /// - Requesting a different key selects it in that key's starting
    ///   direction, unless an explicit direction was supplied.
    pub fn resolve(
        previous: Option<SortState>,
        requested_key: Option<&str>,
        requested_descending: Option<bool>,
    ) -> SortState {
        let base = previous.unwrap_or_default();
        match requested_key.and_then(SortKey::parse) {
            Some(key) if key == base.key => SortState {
                key,
                descending: requested_descending.unwrap_or(!base.descending),
            },
            Some(key) => SortState {
                key,
                descending: requested_descending.unwrap_or_else(|| key.default_descending()),
            },
            None => SortState {
                key: base.key,
                descending: requested_descending.unwrap_or(base.descending),
            },
        }
    }
}
