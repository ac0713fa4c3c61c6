// JSON-file-backed store: one pretty-printed file per domain under a data directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Document, Domain, Store};
use crate::error::StoreError;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".data";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, domain: Domain) -> PathBuf {
        self.dir.join(domain.file_name())
    }

    fn try_load(&self, domain: Domain) -> Result<Option<Document>, StoreError> {
        let path = self.path_for(domain);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<serde_json::Value>(&text)? {
            serde_json::Value::Object(map) => Ok(Some(map)),
            _ => Err(StoreError::NotAnObject),
        }
    }

    fn try_save(&self, domain: Domain, document: &Document) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string_pretty(document)?;

        // Readers never observe a partially written document.
        let path = self.path_for(domain);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, text)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl Store for JsonFileStore {
    fn load(&self, domain: Domain) -> Document {
        match self.try_load(domain) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!(%domain, "No persisted document, starting empty");
                Document::new()
            }
            Err(e) => {
                warn!(%domain, path = %self.path_for(domain).display(), error = %e, "Unreadable document treated as empty");
                Document::new()
            }
        }
    }

    fn save(&self, domain: Domain, document: &Document) {
        if let Err(e) = self.try_save(domain, document) {
            warn!(%domain, path = %self.path_for(domain).display(), error = %e, "Failed to persist document");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load(Domain::History).is_empty());
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("data"));

        store.save(Domain::Settings, &doc(json!({"total_cost": 1.5})));

        assert!(store.path_for(Domain::Settings).exists());
        assert_eq!(store.load(Domain::Settings)["total_cost"], json!(1.5));
    }

    #[test]
    fn malformed_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path_for(Domain::Results), "{ not json").unwrap();

        assert!(store.load(Domain::Results).is_empty());
    }

    #[test]
    fn non_object_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path_for(Domain::History), "[1, 2, 3]").unwrap();

        assert!(store.load(Domain::History).is_empty());
    }

    #[test]
    fn save_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.save(Domain::Settings, &doc(json!({"a": 1, "b": 2})));
        store.save(Domain::Settings, &doc(json!({"c": 3})));

        let loaded = store.load(Domain::Settings);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["c"], json!(3));
        assert!(!dir.path().join("settings.json.tmp").exists());
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        // A directory in place of the document makes the rename fail.
        std::fs::create_dir(store.path_for(Domain::Results)).unwrap();

        store.save(Domain::Results, &doc(json!({"results": {}})));

        assert!(!dir.path().join("results.json.tmp").exists());
        assert!(store.path_for(Domain::Results).is_dir());
    }

    #[test]
    fn unwritable_location_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let store = JsonFileStore::new(blocker.join("data"));
        store.save(Domain::History, &doc(json!({"history": []})));

        assert!(store.load(Domain::History).is_empty());
    }
}
