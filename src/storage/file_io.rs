//! JSON file I/O helpers
//!
//! Reading returns the default value when the file does not exist yet.
//! Writing goes through a temp file and rename so a crash mid-write never
//! leaves a truncated data file.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CostlogError;

/// Read a JSON file into a value, returning the default if the file is missing
pub fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CostlogError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| CostlogError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| CostlogError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write a value as pretty JSON atomically (temp file + rename)
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), CostlogError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| CostlogError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
    }

    let contents = serde_json::to_string_pretty(value)
        .map_err(|e| CostlogError::Json(format!("Failed to serialize: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, contents)
        .map_err(|e| CostlogError::Io(format!("Failed to write {}: {}", tmp_path.display(), e)))?;

    std::fs::rename(&tmp_path, path)
        .map_err(|e| CostlogError::Io(format!("Failed to rename {}: {}", tmp_path.display(), e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        items: Vec<String>,
    }

    #[test]
    fn test_read_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let value: Sample = read_json(&temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(value, Sample::default());
    }

    #[test]
    fn test_write_and_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.json");

        let value = Sample {
            items: vec!["a".into(), "b".into()],
        };
        write_json_atomic(&path, &value).unwrap();

        let loaded: Sample = read_json(&path).unwrap();
        assert_eq!(loaded, value);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
