//! Storage layer for tracereverse
//!
//! Progress, learning-path and library managers persist their state as JSON
//! documents under string keys. The backend is injected as a
//! [`KeyValueStore`]: SQLite on disk, or an in-memory map for tests and
//! `--ephemeral` runs.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{Result, TrError};

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteStore;

/// Get/set/delete by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns whether a value was removed.
    fn delete(&self, key: &str) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }
}

/// Load a JSON document, falling back to `T::default()` when the key is
/// missing or blank.
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&raw)
        .map_err(|err| TrError::Serialization(format!("{key} parse: {err}")))
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let payload = serde_json::to_string(value)
        .map_err(|err| TrError::Serialization(format!("{key} serialize: {err}")))?;
    trace!(target: "store", key, bytes = payload.len(), "save");
    store.set(key, &payload)
}
