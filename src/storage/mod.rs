//! File-based storage for form drafts
//!
//! Project-local storage (`.rfq-forms/` in project root):
//! - `drafts/` - One JSON snapshot per session, written atomically
//! - `config.toml` - Project configuration

pub mod drafts;

pub use drafts::{DraftFile, DraftSummary, FileDraftSink};

use std::fs;
use std::path::Path;

/// Common file operations result type
pub type FileResult<T> = Result<T, String>;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> FileResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| format!("Failed to create directory {:?}: {}", path, e))?;
    }
    Ok(())
}

/// Write data to a file atomically (temp file + rename)
pub fn atomic_write(path: &Path, content: &str) -> FileResult<()> {
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    fs::write(&temp_path, content)
        .map_err(|e| format!("Failed to write temp file {:?}: {}", temp_path, e))?;

    fs::rename(&temp_path, path)
        .map_err(|e| format!("Failed to rename {:?} to {:?}: {}", temp_path, path, e))?;

    Ok(())
}

/// Read a JSON file and deserialize it
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> FileResult<T> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse JSON from {:?}: {}", path, e))
}

/// Write data as pretty-printed JSON atomically
pub fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> FileResult<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to serialize to JSON: {}", e))?;

    atomic_write(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b");

        ensure_dir(&nested_path).unwrap();
        assert!(nested_path.exists());
        // Second call is a no-op
        ensure_dir(&nested_path).unwrap();
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("drafts").join("s1.json");

        atomic_write(&file_path, "{}").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}");
        assert!(!file_path.with_extension("tmp").exists());
    }

    #[test]
    fn test_read_json_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("broken.json");
        fs::write(&file_path, "{ not json").unwrap();

        let result: FileResult<serde_json::Value> = read_json(&file_path);
        assert!(result.unwrap_err().contains("Failed to parse JSON"));
    }
}
