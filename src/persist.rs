//! Persistence bridge
//!
//! Connects an [`EntryStore`] to a storage backend behind the
//! [`StoragePort`] trait. The store never knows where its snapshot lives;
//! hosts inject an in-memory map, a file directory, or anything else that
//! can hold a string per key.
//!
//! Loading is defensive: a missing key, malformed JSON, a non-array
//! payload, or invalid elements all degrade to an empty store with a
//! warning rather than failing startup. Every successful mutation writes
//! the full snapshot back through the port.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::CoreError;
use crate::store::{Confirmation, EntryDraft, EntryFilter, EntryPatch, EntryStore};
use crate::types::{Entry, EntryId};

/// Host-injected key/value storage.
///
/// Values are opaque strings; the bridge owns the JSON encoding. Backend
/// failures surface as [`CoreError::Storage`].
pub trait StoragePort {
    /// Returns the stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

impl<T: StoragePort + ?Sized> StoragePort for &T {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set(key, value)
    }
}

/// In-memory backend, used by hosts without durable storage and by tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a key directly, bypassing the bridge.
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File backend: one `<key>.json` file per key under a base directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the backend, making the directory if needed.
    pub fn open(dir: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| CoreError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        fs::write(self.path_for(key), value).map_err(|e| CoreError::Storage(e.to_string()))
    }
}

/// An [`EntryStore`] wired to a storage backend with write-through on every
/// mutation.
#[derive(Debug)]
pub struct PersistentStore<P: StoragePort> {
    store: EntryStore,
    port: P,
    key: String,
}

impl<P: StoragePort> PersistentStore<P> {
    /// Loads the snapshot under `key` and hydrates a store from it.
    ///
    /// Unreadable or invalid snapshots are logged and replaced with an
    /// empty store; one bad snapshot never takes the host down. A backend
    /// read failure is still an error since the data may be intact.
    pub fn open(port: P, key: impl Into<String>) -> Result<Self, CoreError> {
        let key = key.into();
        let store = match port.get(&key)? {
            None => EntryStore::new(),
            Some(raw) => match decode_snapshot(&raw) {
                Ok(entries) => EntryStore::hydrate(entries),
                Err(e) => {
                    log::warn!("discarding corrupt snapshot under {key:?}: {e}");
                    EntryStore::new()
                }
            },
        };
        Ok(Self { store, port, key })
    }

    /// Adds an entry and writes the snapshot through.
    pub fn add(&mut self, draft: EntryDraft) -> Result<EntryId, CoreError> {
        let id = self.store.add(draft)?.id;
        self.flush()?;
        Ok(id)
    }

    /// Updates an entry and writes the snapshot through.
    pub fn update(&mut self, id: EntryId, patch: EntryPatch) -> Result<(), CoreError> {
        self.store.update(id, patch)?;
        self.flush()
    }

    /// Removes an entry and writes the snapshot through.
    pub fn remove(
        &mut self,
        id: EntryId,
        confirmation: Confirmation,
    ) -> Result<Entry, CoreError> {
        let removed = self.store.remove(id, confirmation)?;
        self.flush()?;
        Ok(removed)
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.store.get(id)
    }

    pub fn list<'a>(
        &'a self,
        filter: Option<&'a EntryFilter>,
    ) -> impl Iterator<Item = &'a Entry> + 'a {
        self.store.list(filter)
    }

    /// Read-only view of the underlying store, for aggregation.
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    fn flush(&self) -> Result<(), CoreError> {
        let encoded = serde_json::to_string(self.store.entries())?;
        self.port.set(&self.key, &encoded)
    }
}

/// Decodes and screens a persisted snapshot.
///
/// The payload must be a JSON array of well-formed entries; every element
/// is re-validated against the domain rules it was stored under.
fn decode_snapshot(raw: &str) -> Result<Vec<Entry>, CoreError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| CoreError::CorruptSnapshot(e.to_string()))?;
    if !value.is_array() {
        return Err(CoreError::CorruptSnapshot(
            "expected a JSON array of entries".to_string(),
        ));
    }
    let entries: Vec<Entry> = serde_json::from_value(value)
        .map_err(|e| CoreError::CorruptSnapshot(e.to_string()))?;
    for entry in &entries {
        EntryStore::validate(entry)
            .map_err(|e| CoreError::CorruptSnapshot(format!("entry {}: {e}", entry.id)))?;
    }
    Ok(entries)
}
