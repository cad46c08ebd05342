//! JSON file key-value store

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, StorageResult, StoreWrite};

/// Durable key-value store persisted as a single JSON object
///
/// The whole map is kept in memory and rewritten on every change. Writes go to
/// a temporary sibling file first and are renamed into place, so a crash never
/// leaves a half-written store behind. The in-memory map only changes once the
/// file has been replaced. On unix the file is readable by its owner only.
///
/// # Examples
///
/// ```rust,no_run
/// use jobpulse_console::storage::{FileStore, KeyValueStore};
///
/// # fn example() -> Result<(), jobpulse_console::storage::StorageError> {
/// let store = FileStore::open("/var/lib/jobpulse-console/storage.json")?;
/// store.set("jp-theme", "\"dark\"".to_string())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store at `path`
    ///
    /// A store file that is not valid JSON is discarded with a warning rather
    /// than failing startup.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `path` is a directory
    /// - The parent directory cannot be created
    /// - The existing file cannot be read
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        if path.is_dir() {
            return Err(StorageError::InvalidPath(format!(
                "{} is a directory",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = Self::read_entries(&path)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened durable store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the store file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> StorageResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Durable store is corrupt, starting empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        let result = Self::write_private(&tmp, &serde_json::to_vec_pretty(entries)?)
            .and_then(|()| fs::rename(&tmp, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result.map_err(StorageError::from)
    }

    #[cfg(unix)]
    fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    #[cfg(not(unix))]
    fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        fs::write(path, bytes)
    }

    /// Run `change` on a copy of the map and keep the copy only if it persists
    fn commit<R>(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> R,
    ) -> StorageResult<R> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        let out = change(&mut next);
        if next != *entries {
            self.persist(&next)?;
            *entries = next;
        }
        drop(entries);
        Ok(out)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.commit(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> StorageResult<Option<String>> {
        self.commit(|entries| entries.remove(key))
    }

    fn apply(&self, writes: Vec<StoreWrite>) -> StorageResult<()> {
        self.commit(|entries| {
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
        })
    }
}
