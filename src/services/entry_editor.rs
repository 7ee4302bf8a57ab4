//! Entry editor service
//!
//! Authorizes and persists create, update and delete of a single cost
//! entry. Shares the visibility and authorization primitives with the
//! query path but is otherwise independent of it.

use chrono::NaiveDate;

use crate::auth::Authorizer;
use crate::error::{CostlogError, CostlogResult};
use crate::models::{CostEntry, CostEntryId, CostTypeId, IssueId, UserId};
use crate::query::scope::EntryScope;
use crate::storage::Storage;

/// Attributes supplied by a create or edit request.
///
/// Fields left at `None` keep the entry's prior (or default) values. There
/// is deliberately no cost amount here: costs are always derived from the
/// units and the cost type's rate.
#[derive(Debug, Clone, Default)]
pub struct EntryPayload {
    pub spent_on: Option<NaiveDate>,
    pub units: Option<f64>,
    pub cost_type_id: Option<CostTypeId>,
    /// The entry's owner, when different from the acting user
    pub user_id: Option<UserId>,
    pub issue_id: Option<IssueId>,
    pub comment: Option<String>,
}

/// Service for creating, updating and deleting cost entries
pub struct EntryEditor<'a, A: Authorizer> {
    storage: &'a Storage,
    authorizer: &'a A,
}

impl<'a, A: Authorizer> EntryEditor<'a, A> {
    pub fn new(storage: &'a Storage, authorizer: &'a A) -> Self {
        Self {
            storage,
            authorizer,
        }
    }

    /// Create a new entry in the given scope.
    ///
    /// The entry starts bound to the scope's project and issue, the acting
    /// user and today's date; the payload then overwrites whatever it
    /// supplies. Naming an owner requires that user to hold book-costs on
    /// the project; otherwise the whole operation is forbidden and nothing
    /// is persisted.
    pub fn create(
        &self,
        caller: UserId,
        scope: &EntryScope,
        payload: EntryPayload,
        today: NaiveDate,
    ) -> CostlogResult<CostEntry> {
        if !self.authorizer.can_book_costs(caller, scope.project.id)? {
            return Err(CostlogError::Forbidden("book costs".into()));
        }

        if let Some(owner_id) = payload.user_id {
            let owner_known = self.storage.users.get(owner_id)?.is_some();
            if !owner_known || !self.authorizer.can_book_costs(owner_id, scope.project.id)? {
                return Err(CostlogError::Forbidden(
                    "named owner may not book costs on this project".into(),
                ));
            }
        }

        let mut entry = CostEntry::new(
            scope.project.id,
            scope.issue.as_ref().map(|i| i.id),
            payload.user_id.unwrap_or(caller),
            CostTypeId::new(), // placeholder until apply() settles the type
            today,
        );
        self.apply(&mut entry, payload, true)?;

        entry
            .validate()
            .map_err(CostlogError::Validation)?;

        self.storage.entries.upsert(entry.clone())?;
        self.storage.entries.save()?;
        Ok(entry)
    }

    /// Update an existing entry in place.
    ///
    /// Only callers for whom the entry is editable may mutate it. Supplied
    /// attributes overwrite; omitted ones keep their values.
    pub fn update(
        &self,
        caller: UserId,
        id: CostEntryId,
        payload: EntryPayload,
    ) -> CostlogResult<CostEntry> {
        let mut entry = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| CostlogError::entry_not_found(id.to_string()))?;

        if !self.authorizer.can_edit(caller, &entry)? {
            return Err(CostlogError::Forbidden("edit cost entry".into()));
        }

        if let Some(owner_id) = payload.user_id {
            if owner_id != entry.user_id {
                let owner_known = self.storage.users.get(owner_id)?.is_some();
                if !owner_known || !self.authorizer.can_book_costs(owner_id, entry.project_id)? {
                    return Err(CostlogError::Forbidden(
                        "named owner may not book costs on this project".into(),
                    ));
                }
                entry.user_id = owner_id;
            }
        }

        self.apply(&mut entry, payload, false)?;

        entry
            .validate()
            .map_err(CostlogError::Validation)?;

        self.storage.entries.upsert(entry.clone())?;
        self.storage.entries.save()?;
        Ok(entry)
    }

    /// Delete an entry. Requires the entry to exist and be editable by the
    /// caller.
    pub fn delete(&self, caller: UserId, id: CostEntryId) -> CostlogResult<CostEntry> {
        let entry = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| CostlogError::entry_not_found(id.to_string()))?;

        if !self.authorizer.can_edit(caller, &entry)? {
            return Err(CostlogError::Forbidden("delete cost entry".into()));
        }

        self.storage.entries.delete(id)?;
        self.storage.entries.save()?;
        Ok(entry)
    }

    /// Overwrite the entry with whatever the payload supplies, settle the
    /// cost type (falling back to the system default on create), and
    /// recompute the derived cost amount.
    fn apply(
        &self,
        entry: &mut CostEntry,
        payload: EntryPayload,
        is_new: bool,
    ) -> CostlogResult<()> {
        if let Some(spent_on) = payload.spent_on {
            entry.spent_on = spent_on;
        }
        if let Some(units) = payload.units {
            entry.units = units;
        }
        if let Some(issue_id) = payload.issue_id {
            let issue = self
                .storage
                .issues
                .get(issue_id)?
                .ok_or_else(|| CostlogError::issue_not_found(issue_id.to_string()))?;
            if issue.project_id != entry.project_id {
                return Err(CostlogError::Validation(
                    "issue belongs to a different project".into(),
                ));
            }
            entry.issue_id = Some(issue_id);
        }
        if let Some(comment) = payload.comment {
            entry.comment = comment;
        }

        let cost_type = match payload.cost_type_id {
            Some(id) => Some(
                self.storage
                    .cost_types
                    .get(id)?
                    .ok_or_else(|| CostlogError::cost_type_not_found(id.to_string()))?,
            ),
            None if is_new => self.storage.cost_types.default_type()?,
            None => self.storage.cost_types.get(entry.cost_type_id)?,
        };

        let cost_type = cost_type.ok_or_else(|| {
            CostlogError::Validation("no cost type given and no default configured".into())
        })?;
        entry.cost_type_id = cost_type.id;
        entry.costs = cost_type.cost_for(entry.units);

        Ok(())
    }
}
