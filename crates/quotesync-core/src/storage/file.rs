//! JSON-file backed key-value store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::KeyValueStore;

/// Default file name inside the data directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// Durable store keeping every key in one JSON object on disk.
///
/// The whole object is rewritten on each mutation through a temporary file
/// and a rename, so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    pub fn open_in_dir(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join(STATE_FILE_NAME))
    }

    /// Open the store at an explicit file path.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is reported as [`Error::Parse`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|error| {
                    Error::Parse(format!(
                        "Failed to parse state at {}: {error}",
                        path.display()
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to disk, then adopt them as the in-memory state.
    /// On failure the store keeps what it last persisted.
    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(&temp_path, &self.path)?;
        self.entries = entries;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.commit(next)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = JsonFileStore::open_in_dir(dir.path()).unwrap();
            store.set("quotes", "[]").unwrap();
            store.set("selectedCategory", "Life").unwrap();
        }

        let reopened = JsonFileStore::open_in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get("quotes").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            reopened.get("selectedCategory").unwrap().as_deref(),
            Some("Life")
        );
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = JsonFileStore::open_in_dir(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join(STATE_FILE_NAME).exists());
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path), Err(Error::Parse(_))));
    }

    #[test]
    fn failed_write_leaves_previous_values_readable() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let mut store = JsonFileStore::open_in_dir(&data_dir).unwrap();
        store.set("quotes", "[1]").unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();

        assert!(matches!(store.set("quotes", "[2]"), Err(Error::Io(_))));
        assert!(store.set("lastQuote", "x").is_err());
        assert!(store.remove("quotes").is_err());
        assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("lastQuote").unwrap(), None);
    }

    #[test]
    fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open_in_dir(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();

        let reopened = JsonFileStore::open_in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get("k").unwrap(), None);
    }
}
