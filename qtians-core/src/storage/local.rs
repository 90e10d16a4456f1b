use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Slot;
use crate::models::{DevotionalRecord, SubmitterProfile};
use crate::HISTORY_LIMIT;

/// Errors that can occur during local storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error reading or writing a slot file.
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    /// Slot file exists but does not hold the expected JSON.
    #[error("Failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_json::Error),

    /// Value could not be encoded.
    #[error("Failed to encode {}: {}", .0.display(), .1)]
    Encode(PathBuf, #[source] serde_json::Error),
}

/// JSON slot storage rooted at a data directory.
#[derive(Clone, Debug)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a slot.
    pub fn path(&self, slot: Slot) -> PathBuf {
        self.data_dir.join(slot.filename())
    }

    pub fn exists(&self, slot: Slot) -> bool {
        self.path(slot).exists()
    }

    /// Loads a slot.
    ///
    /// Returns `Ok(None)` if the file doesn't exist or is blank.
    pub fn load<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>, StorageError> {
        let path = self.path(slot);

        match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|e| StorageError::Parse(path, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    /// Saves a slot, creating the data directory if needed.
    ///
    /// Written to a sibling temp file, then renamed over the slot.
    pub fn save<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::Io(self.data_dir.clone(), e))?;

        let path = self.path(slot);
        let json =
            serde_json::to_string_pretty(value).map_err(|e| StorageError::Encode(path.clone(), e))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Io(path, e))?;

        Ok(())
    }

    /// Removes a slot. Missing files are not an error.
    pub fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        let path = self.path(slot);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    pub fn load_history(&self) -> Result<Option<Vec<DevotionalRecord>>, StorageError> {
        self.load(Slot::History)
    }

    /// Persists the history, keeping only the newest `HISTORY_LIMIT` entries.
    pub fn save_history(&self, records: &[DevotionalRecord]) -> Result<(), StorageError> {
        let capped = &records[..records.len().min(HISTORY_LIMIT)];
        self.save(Slot::History, capped)
    }

    pub fn load_profile(&self) -> Result<Option<SubmitterProfile>, StorageError> {
        self.load(Slot::Profile)
    }

    pub fn save_profile(&self, profile: &SubmitterProfile) -> Result<(), StorageError> {
        self.save(Slot::Profile, profile)
    }

    pub fn clear_profile(&self) -> Result<(), StorageError> {
        self.remove(Slot::Profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn record(name: &str) -> DevotionalRecord {
        DevotionalRecord::new("2026-02-01", name, "본당 고등부", "1마을", "시편 23편")
    }

    #[test]
    fn test_store_path() {
        let (store, _temp) = test_store();
        assert!(store.path(Slot::History).ends_with("history.json"));
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (store, _temp) = test_store();
        assert!(store.load_history().unwrap().is_none());
        assert!(store.load_profile().unwrap().is_none());
        assert!(!store.exists(Slot::History));
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let store = LocalStore::new(nested_dir.clone());

        store.save_history(&[record("a")]).unwrap();

        assert!(nested_dir.exists());
        assert!(store.exists(Slot::History));
        assert!(!nested_dir.join("history.json.tmp").exists());
    }

    #[test]
    fn test_history_roundtrip_preserves_order() {
        let (store, _temp) = test_store();
        let records = vec![record("newest"), record("older"), record("oldest")];

        store.save_history(&records).unwrap();
        let loaded = store.load_history().unwrap().unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_save_history_caps_entries() {
        let (store, _temp) = test_store();
        let records: Vec<_> = (0..60).map(|i| record(&format!("member{}", i))).collect();

        store.save_history(&records).unwrap();
        let loaded = store.load_history().unwrap().unwrap();

        assert_eq!(loaded.len(), HISTORY_LIMIT);
        assert_eq!(loaded[0].name, "member0");
        assert_eq!(loaded[49].name, "member49");
    }

    #[test]
    fn test_corrupt_slot_is_parse_error() {
        let (store, _temp) = test_store();
        fs::write(store.path(Slot::History), "{not json").unwrap();

        let err = store.load_history().unwrap_err();
        assert!(matches!(err, StorageError::Parse(_, _)));
        assert!(err.to_string().contains("history.json"));
    }

    #[test]
    fn test_blank_slot_is_none() {
        let (store, _temp) = test_store();
        fs::write(store.path(Slot::Profile), "  \n").unwrap();
        assert!(store.load_profile().unwrap().is_none());
    }

    #[test]
    fn test_profile_overwrite_and_clear() {
        let (store, _temp) = test_store();

        store
            .save_profile(&SubmitterProfile::new("a", "b", "c"))
            .unwrap();
        store
            .save_profile(&SubmitterProfile::new("김민수", "1마을", "본당 고등부"))
            .unwrap();
        assert_eq!(
            store.load_profile().unwrap(),
            Some(SubmitterProfile::new("김민수", "1마을", "본당 고등부"))
        );

        store.clear_profile().unwrap();
        assert!(store.load_profile().unwrap().is_none());
        store.clear_profile().unwrap();
    }
}
