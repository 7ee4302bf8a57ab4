//! User settings for costlog
//!
//! Manages preferences that shape listings: page size, feed cap, whether a
//! project scope includes its subproject tree, and the first day of the week
//! used by week-based date presets.

use serde::{Deserialize, Serialize};

use super::paths::CostlogPaths;
use crate::error::CostlogError;

/// User settings for costlog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Rows per page in the interactive listing
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    /// Maximum number of entries in the feed
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,

    /// Whether a project scope also covers its subproject tree
    #[serde(default = "default_display_subprojects")]
    pub display_subprojects: bool,

    /// First day of week (0 = Sunday, 1 = Monday), used by week presets
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_per_page() -> usize {
    25
}

fn default_feed_limit() -> usize {
    15
}

fn default_display_subprojects() -> bool {
    true
}

fn default_first_day_of_week() -> u8 {
    1 // Monday
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            per_page: default_per_page(),
            feed_limit: default_feed_limit(),
            display_subprojects: default_display_subprojects(),
            first_day_of_week: default_first_day_of_week(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &CostlogPaths) -> Result<Self, CostlogError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| CostlogError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| CostlogError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Create default settings; let the caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CostlogPaths) -> Result<(), CostlogError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CostlogError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| CostlogError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
