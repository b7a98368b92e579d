// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::ExportDocument;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified output directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the output directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Writes the export document as pretty-printed JSON (2-space indent)
    /// under the output directory. One file per run, no retries.
    pub fn save_export(
        &self,
        doc: &ExportDocument,
        filename: &str,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(filename);

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved export to {}", file_path.display());

        Ok(file_path)
    }

    /// Path for a sibling debug file next to an export, e.g.
    /// `cachetur-changelog-2024-03-12-region.html` for the matching export.
    pub fn debug_path(&self, export_filename: &str) -> PathBuf {
        let stem = export_filename
            .strip_suffix(".json")
            .unwrap_or(export_filename);
        self.base_dir.join(format!("{}-region.html", stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::assemble;
    use crate::extractors::changelog::{ChangelogEntry, ChangelogTable};

    #[test]
    fn save_export_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();

        let tables = vec![ChangelogTable {
            date: Some("12. mars 2024".to_string()),
            entries: vec![ChangelogEntry {
                time: "14:30".to_string(),
                kind: "Feil".to_string(),
                description: "Fixed login bug".to_string(),
                ticket: None,
                ticket_url: None,
            }],
        }];
        let doc = assemble(tables, "https://cachetur.no/app");

        let path = storage.save_export(&doc, "test-export.json").unwrap();
        let written = fs::read_to_string(&path).unwrap();

        // Pretty-printed with 2-space indent
        assert!(written.contains("\n  \"source\": \"https://cachetur.no/app\""));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["totalEntries"], 1);
        assert_eq!(value["data"][0]["entries"][0]["time"], "14:30");
    }

    #[test]
    fn new_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("exports");

        StorageManager::new(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn debug_path_swaps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();

        let path = storage.debug_path("cachetur-changelog-2024-03-12.json");
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("cachetur-changelog-2024-03-12-region.html"));
    }
}
