//! Configuration for costlog
//!
//! Path resolution, user settings, and the persisted per-listing session
//! state.

pub mod paths;
pub mod session;
pub mod settings;

pub use paths::CostlogPaths;
pub use session::SessionState;
pub use settings::Settings;
