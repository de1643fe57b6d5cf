//! Local persistence for generated work items
//!
//! The store is an injected key-value interface rather than a singleton:
//! commands construct an [`ItemStore`] over a [`KeyValueStore`]
//! implementation and pass it where persistence is needed. The default
//! implementation keeps one JSON file per key under the platform data
//! directory.

use std::fs;
use std::path::PathBuf;

use autoagile_core::work_item::WorkItem;

use crate::error::Error;

/// Minimal key-value interface backing local persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<bool, Error>;
    fn keys(&self) -> Result<Vec<String>, Error>;
}

/// One JSON file per key under a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self, Error> {
        let dir = dirs_next::data_dir()
            .ok_or_else(|| Error::Store("Could not determine the data directory".to_string()))?
            .join("autoagile");
        Ok(Self::new(dir))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Keys map to file names, so anything outside [A-Za-z0-9_-] becomes '_'.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, Error> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

const ITEM_KEY_PREFIX: &str = "item-";

/// Typed work item persistence over a [`KeyValueStore`].
pub struct ItemStore<S: KeyValueStore> {
    store: S,
}

impl ItemStore<JsonFileStore> {
    pub fn open_default() -> Result<Self, Error> {
        Ok(Self::new(JsonFileStore::open_default()?))
    }
}

impl<S: KeyValueStore> ItemStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key_for(id: &str) -> String {
        format!("{ITEM_KEY_PREFIX}{id}")
    }

    pub fn save(&self, item: &WorkItem) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(item)
            .map_err(|e| Error::Store(format!("Failed to serialize work item: {e}")))?;
        self.store.set(&Self::key_for(&item.id), &json)
    }

    pub fn load(&self, id: &str) -> Result<WorkItem, Error> {
        let Some(json) = self.store.get(&Self::key_for(id))? else {
            return Err(Error::ItemNotFound(id.to_string()));
        };

        serde_json::from_str(&json)
            .map_err(|e| Error::Store(format!("Failed to parse stored work item '{id}': {e}")))
    }

    /// All stored items, newest first. Corrupt records are skipped.
    pub fn list(&self) -> Result<Vec<WorkItem>, Error> {
        let mut items = Vec::new();
        for key in self.store.keys()? {
            let Some(id) = key.strip_prefix(ITEM_KEY_PREFIX) else {
                continue;
            };
            if let Ok(item) = self.load(id) {
                items.push(item);
            }
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    pub fn delete(&self, id: &str) -> Result<bool, Error> {
        self.store.remove(&Self::key_for(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoagile_core::work_item::{WorkItemStatus, WorkItemType};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn fixture_item(id: &str, hour: u32) -> WorkItem {
        WorkItem::new(
            id.to_string(),
            WorkItemType::Story,
            "Restore CSV export".to_string(),
            "Exports fail for unicode rows.".to_string(),
            Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_set_get_remove_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().to_path_buf());

        assert_eq!(store.get("missing").unwrap(), None);

        store.set("connection", "{\"baseUrl\":\"x\"}").unwrap();
        assert_eq!(
            store.get("connection").unwrap().as_deref(),
            Some("{\"baseUrl\":\"x\"}")
        );

        assert!(store.remove("connection").unwrap());
        assert!(!store.remove("connection").unwrap());
        assert_eq!(store.get("connection").unwrap(), None);
    }

    #[test]
    fn test_keys_lists_only_json_stems() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().to_path_buf());

        store.set("item-a", "{}").unwrap();
        store.set("item-b", "{}").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["item-a", "item-b"]);
    }

    #[test]
    fn test_keys_on_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("never-created"));
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_unsafe_key_characters_are_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().to_path_buf());

        store.set("a/b c", "value").unwrap();
        assert_eq!(store.get("a/b c").unwrap().as_deref(), Some("value"));
        assert_eq!(store.keys().unwrap(), vec!["a_b_c"]);
    }

    #[test]
    fn test_item_store_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let items = ItemStore::new(JsonFileStore::new(temp_dir.path().to_path_buf()));

        let item = fixture_item("wi-1", 9);
        items.save(&item).unwrap();

        let loaded = items.load("wi-1").unwrap();
        assert_eq!(loaded, item);
        assert_eq!(loaded.status, WorkItemStatus::Draft);
    }

    #[test]
    fn test_item_store_load_missing_errors() {
        let temp_dir = TempDir::new().unwrap();
        let items = ItemStore::new(JsonFileStore::new(temp_dir.path().to_path_buf()));

        let err = items.load("wi-404").unwrap_err();
        assert!(matches!(err, Error::ItemNotFound(_)));
    }

    #[test]
    fn test_item_store_lists_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let items = ItemStore::new(JsonFileStore::new(temp_dir.path().to_path_buf()));

        items.save(&fixture_item("wi-old", 8)).unwrap();
        items.save(&fixture_item("wi-new", 15)).unwrap();

        let listed = items.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "wi-new");
        assert_eq!(listed[1].id, "wi-old");
    }

    #[test]
    fn test_item_store_delete() {
        let temp_dir = TempDir::new().unwrap();
        let items = ItemStore::new(JsonFileStore::new(temp_dir.path().to_path_buf()));

        items.save(&fixture_item("wi-1", 9)).unwrap();
        assert!(items.delete("wi-1").unwrap());
        assert!(!items.delete("wi-1").unwrap());
        assert!(items.list().unwrap().is_empty());
    }

    #[test]
    fn test_item_store_list_skips_corrupt_records() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().to_path_buf());
        store.set("item-bad", "not json").unwrap();

        let items = ItemStore::new(JsonFileStore::new(temp_dir.path().to_path_buf()));
        items.save(&fixture_item("wi-1", 9)).unwrap();

        let listed = items.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "wi-1");
    }
}
