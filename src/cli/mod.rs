//! CLI command declarations and handlers
//!
//! The error taxonomy maps to process exit codes: forbidden 3, not-found
//! 4, validation 5, anything else 1.

pub mod admin;
pub mod entry;
pub mod report;

pub use admin::{
    handle_cost_type_command, handle_member_command, handle_project_command, handle_user_command,
    CostTypeCommands, MemberCommands, ProjectCommands, UserCommands,
};
pub use entry::{handle_delete, handle_edit, handle_log, DeleteArgs, EditArgs, LogArgs};
pub use report::{handle_export, handle_feed, handle_report, ExportArgs, FeedArgs, ReportArgs};

use crate::error::{CostlogError, CostlogResult};
use crate::models::User;
use crate::storage::Storage;

/// Exit code for a costlog error
pub fn exit_code(err: &CostlogError) -> i32 {
    match err {
        CostlogError::Forbidden(_) => 3,
        CostlogError::NotFound { .. } => 4,
        CostlogError::Validation(_) => 5,
        _ => 1,
    }
}

/// Resolve the acting user from the global `--user` option
pub fn resolve_caller(storage: &Storage, login: Option<&str>) -> CostlogResult<User> {
    let login = login.ok_or_else(|| {
        CostlogError::Validation("No acting user; pass --user or set COSTLOG_USER".into())
    })?;
    storage
        .users
        .find(login)?
        .ok_or_else(|| CostlogError::user_not_found(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&CostlogError::Forbidden("x".into())), 3);
        assert_eq!(exit_code(&CostlogError::entry_not_found("x")), 4);
        assert_eq!(exit_code(&CostlogError::Validation("x".into())), 5);
        assert_eq!(exit_code(&CostlogError::Io("x".into())), 1);
    }
}
