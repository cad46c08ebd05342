//! In-memory key-value store

use parking_lot::Mutex;
use std::collections::HashMap;

use super::{KeyValueStore, StorageResult, StoreWrite};

/// Process-lifetime key-value store
///
/// Backs session-scoped slots; everything is gone when the console exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().remove(key))
    }

    fn apply(&self, writes: Vec<StoreWrite>) -> StorageResult<()> {
        let mut entries = self.entries.lock();
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => {
                    entries.insert(key, value);
                }
                StoreWrite::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
