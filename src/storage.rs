use crate::errors::StoreError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::error;

pub const GAMING_PACKAGES: &str = "gaming.packages";
pub const GAMING_SUBSCRIPTIONS: &str = "gaming.subscriptions";
pub const SNACK_DAILY_SALES: &str = "snack.dailySales";
pub const SNACK_CUSTOMERS: &str = "snack.customers";
pub const SNACK_PRICE_SETTING: &str = "snack.priceSetting";

/// Durable key-value storage, one serialized collection per key.
///
/// `load` never fails: an absent key is `None`. Writes are synchronous, so a
/// `load` after a successful `save` on the same store sees the new value.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Option<Value>;
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> Option<Value> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}

/// Reads `key` as a `T`, falling back to `default` when the key is absent or
/// its contents no longer deserialize.
pub fn load_or<T, F>(store: &impl KeyValueStore, key: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.load(key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("failed to parse stored {key}: {err}");
                default()
            }
        },
        None => default(),
    }
}

pub fn save_as<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.save(key, value)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys live in a single JSON document that is rewritten on every save.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    /// Blocking write; async callers run it off the runtime threads.
    /// The in-memory entry only changes once the file write succeeds.
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_string(), value);
        let written = serde_json::to_vec_pretty(&self.entries)
            .map_err(|source| StoreError::Serialize {
                key: key.to_string(),
                source,
            })
            .and_then(|payload| fs::write(&self.path, payload).map_err(StoreError::from));

        if written.is_err() {
            match previous {
                Some(previous) => self.entries.insert(key.to_string(), previous),
                None => self.entries.remove(key),
            };
        }
        written
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, Value> {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse data file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read data file: {err}");
            BTreeMap::new()
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/state.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_key_loads_default() {
        let store = MemoryStore::new();
        let loaded: Vec<u64> = load_or(&store, "absent", || vec![7]);
        assert_eq!(loaded, vec![7]);
    }

    #[test]
    fn mistyped_value_loads_default() {
        let mut store = MemoryStore::new();
        store.save("numbers", json!({ "not": "a list" })).unwrap();
        let loaded: Vec<u64> = load_or(&store, "numbers", Vec::new);
        assert!(loaded.is_empty());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path);
        save_as(&mut store, "numbers", &vec![1u64, 2, 3]).unwrap();
        save_as(&mut store, "name", &"kiosk").unwrap();

        let reopened = FileStore::open(&path);
        let numbers: Vec<u64> = load_or(&reopened, "numbers", Vec::new);
        let name: String = load_or(&reopened, "name", String::new);
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(name, "kiosk");
    }

    #[test]
    fn failed_write_keeps_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("missing_dir").join("state.json"));

        assert!(save_as(&mut store, "numbers", &vec![1u64]).is_err());
        assert!(store.load("numbers").is_none());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{ this is not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.load(GAMING_PACKAGES).is_none());
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nope.json"));
        assert!(store.load(SNACK_CUSTOMERS).is_none());
    }
}
