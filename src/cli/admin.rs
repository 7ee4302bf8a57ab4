//! Setup CLI commands
//!
//! Projects, users, cost types and memberships; just enough surface to
//! drive the report engine end-to-end from the command line.

use clap::Subcommand;

use crate::error::{CostlogError, CostlogResult};
use crate::models::{CostType, Money, Permission, Project, User};
use crate::storage::Storage;

/// Project management subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommands {
    /// Add a new project
    Add {
        /// Project name
        name: String,
        /// Parent project name or ID, for a subproject
        #[arg(long)]
        parent: Option<String>,
    },
    /// List projects
    List,
}

/// User management subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// Add a new user
    Add {
        /// Login name
        login: String,
        /// Display name
        name: String,
    },
    /// List users
    List,
}

/// Cost type management subcommands
#[derive(Debug, Subcommand)]
pub enum CostTypeCommands {
    /// Add a new cost type
    Add {
        /// Cost type name
        name: String,
        /// Singular unit label (e.g., "hour")
        #[arg(long, default_value = "hour")]
        unit: String,
        /// Plural unit label (e.g., "hours")
        #[arg(long = "unit-plural", default_value = "hours")]
        unit_plural: String,
        /// Rate per unit (e.g., "75.00")
        #[arg(long, default_value = "0")]
        rate: String,
        /// Make this the system-wide default cost type
        #[arg(long)]
        default: bool,
    },
    /// List cost types
    List,
}

/// Membership management subcommands
#[derive(Debug, Subcommand)]
pub enum MemberCommands {
    /// Grant capabilities to a user on a project
    Add {
        /// Project name or ID
        project: String,
        /// User login or ID
        user: String,
        /// Capabilities to grant (view, book, edit, edit_own)
        #[arg(required = true)]
        permissions: Vec<String>,
    },
}

/// Handle a project command
pub fn handle_project_command(storage: &Storage, cmd: ProjectCommands) -> CostlogResult<()> {
    match cmd {
        ProjectCommands::Add { name, parent } => {
            if storage.projects.find(&name)?.is_some() {
                return Err(CostlogError::Validation(format!(
                    "Project '{}' already exists",
                    name
                )));
            }

            let project = match parent {
                Some(parent_ident) => {
                    let parent = storage
                        .projects
                        .find(&parent_ident)?
                        .ok_or_else(|| CostlogError::project_not_found(&parent_ident))?;
                    Project::with_parent(name, parent.id)
                }
                None => Project::new(name),
            };

            println!("Project {} '{}' created.", project.id, project.name);
            storage.projects.upsert(project)?;
            storage.projects.save()?;
        }
        ProjectCommands::List => {
            for project in storage.projects.get_all()? {
                let parent = match project.parent_id {
                    Some(parent_id) => format!(" (parent: {})", parent_id),
                    None => String::new(),
                };
                println!("{} {}{}", project.id, project.name, parent);
            }
        }
    }
    Ok(())
}

/// Handle a user command
pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> CostlogResult<()> {
    match cmd {
        UserCommands::Add { login, name } => {
            if storage.users.find(&login)?.is_some() {
                return Err(CostlogError::Validation(format!(
                    "User '{}' already exists",
                    login
                )));
            }

            let user = User::new(login, name);
            println!("User {} '{}' created.", user.id, user.login);
            storage.users.upsert(user)?;
            storage.users.save()?;
        }
        UserCommands::List => {
            for user in storage.users.get_all()? {
                println!("{} {} ({})", user.id, user.login, user.name);
            }
        }
    }
    Ok(())
}

/// Handle a cost type command
pub fn handle_cost_type_command(storage: &Storage, cmd: CostTypeCommands) -> CostlogResult<()> {
    match cmd {
        CostTypeCommands::Add {
            name,
            unit,
            unit_plural,
            rate,
            default,
        } => {
            let rate = Money::parse(&rate)
                .map_err(|e| CostlogError::Validation(e.to_string()))?;

            let mut cost_type = CostType::new(name, unit, unit_plural, rate);
            cost_type.is_default = default;

            println!(
                "Cost type {} '{}' created ({} per {}).",
                cost_type.id, cost_type.name, cost_type.rate, cost_type.unit
            );
            storage.cost_types.upsert(cost_type)?;
            storage.cost_types.save()?;
        }
        CostTypeCommands::List => {
            for cost_type in storage.cost_types.get_all()? {
                let default_marker = if cost_type.is_default { " [default]" } else { "" };
                println!(
                    "{} {} ({} per {}){}",
                    cost_type.id, cost_type.name, cost_type.rate, cost_type.unit, default_marker
                );
            }
        }
    }
    Ok(())
}

/// Handle a member command
pub fn handle_member_command(storage: &Storage, cmd: MemberCommands) -> CostlogResult<()> {
    match cmd {
        MemberCommands::Add {
            project,
            user,
            permissions,
        } => {
            let mut project = storage
                .projects
                .find(&project)?
                .ok_or_else(|| CostlogError::project_not_found(&project))?;
            let user = storage
                .users
                .find(&user)?
                .ok_or_else(|| CostlogError::user_not_found(&user))?;

            let permissions = permissions
                .iter()
                .map(|p| {
                    Permission::parse(p).ok_or_else(|| {
                        CostlogError::Validation(format!(
                            "Unknown permission '{}'; use view, book, edit or edit_own",
                            p
                        ))
                    })
                })
                .collect::<CostlogResult<Vec<_>>>()?;

            project.add_member(user.id, permissions);
            println!("Granted {} membership on '{}'.", user.login, project.name);
            storage.projects.upsert(project)?;
            storage.projects.save()?;
        }
    }
    Ok(())
}
