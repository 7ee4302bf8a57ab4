//! costlog - Project cost entry reporting from the command line
//!
//! This library implements a reporting and editing surface for cost
//! entries: units of recorded cost attached to a project and optionally an
//! issue. The core is the query-and-report engine, which turns scope
//! parameters (project, issue, cost type, caller, date window) into a
//! correctly scoped, sorted and paginated result set, rendered as an
//! interactive paged view, a capped newest-first feed, or a full CSV
//! export.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution, settings, and per-listing session state
//! - `error`: Custom error types
//! - `models`: Core data models (projects, issues, users, cost types,
//!   cost entries)
//! - `storage`: JSON file storage layer
//! - `auth`: The capability-check oracle (`Authorizer`)
//! - `query`: Scope, date range, sort and query spec construction
//! - `report`: The report engine and its three output formats
//! - `export`: CSV serialization
//! - `services`: The entry editor
//! - `display`: Terminal formatting
//! - `cli`: Command declarations and handlers

pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod report;
pub mod services;
pub mod storage;

pub use error::{CostlogError, CostlogResult};
