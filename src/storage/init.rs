//! Storage initialization
//!
//! Seeds a freshly-initialized data directory with the system default cost
//! type so entry creation has a fallback type from day one.

use crate::config::paths::CostlogPaths;
use crate::error::CostlogError;
use crate::models::{CostType, Money};

use super::Storage;

/// Initialize the storage layout and seed the default cost type
pub fn initialize_storage(paths: &CostlogPaths) -> Result<(), CostlogError> {
    paths.ensure_directories()?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    if storage.cost_types.default_type()?.is_none() {
        let mut labor = CostType::new("Labor", "hour", "hours", Money::from_cents(0));
        labor.is_default = true;
        storage.cost_types.upsert(labor)?;
        storage.cost_types.save()?;
    }

    storage.save_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_seeds_default_cost_type() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let default = storage.cost_types.default_type().unwrap().unwrap();
        assert_eq!(default.name, "Labor");
        assert!(default.is_default);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostlogPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();
        initialize_storage(&paths).unwrap();

        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        assert_eq!(storage.cost_types.get_all().unwrap().len(), 1);
    }
}
