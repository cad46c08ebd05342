//! Typed key-value storage with named slots
//!
//! Every piece of client-side state the console keeps (session token, user
//! profile, theme, sidebar state, pending OAuth state tokens) lives in a named
//! [`Slot`]. Each slot has a fixed [`SlotScope`]:
//!
//! - [`SlotScope::Durable`] slots survive restarts and are backed by a JSON file
//!   ([`FileStore`]).
//! - [`SlotScope::Session`] slots live only as long as the console process
//!   ([`MemoryStore`]).
//!
//! [`Storage`] routes each slot to the right backend and (de)serializes values
//! as JSON, so callers never touch raw keys.
//!
//! # Example
//!
//! ```rust
//! use jobpulse_console::storage::{Slot, Storage};
//!
//! # fn example() -> Result<(), jobpulse_console::storage::StorageError> {
//! let storage = Storage::in_memory();
//! storage.set(&Slot::Theme, &"light")?;
//!
//! let theme: Option<String> = storage.get(&Slot::Theme)?;
//! assert_eq!(theme.as_deref(), Some("light"));
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;
mod slot;

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use slot::{Slot, SlotScope};

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Raw string key-value backend
///
/// Implementations must make [`KeyValueStore::remove`] atomic: the returned
/// value is the one that was removed, and a concurrent `remove` of the same key
/// sees `None`.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Remove `key`, returning the value it held
    fn remove(&self, key: &str) -> StorageResult<Option<String>>;

    /// Apply every write or none of them
    fn apply(&self, writes: Vec<StoreWrite>) -> StorageResult<()>;
}

/// A single raw write inside a [`KeyValueStore::apply`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    /// Store `value` under `key`
    Set {
        /// Storage key
        key: String,
        /// Serialized value
        value: String,
    },
    /// Remove `key`
    Remove {
        /// Storage key
        key: String,
    },
}

/// Slot writes that land together or not at all
///
/// Every slot in a batch must share a [`SlotScope`], since each scope is a
/// separate backend.
///
/// ```rust
/// use jobpulse_console::storage::{Batch, Slot, Storage};
///
/// # fn example() -> Result<(), jobpulse_console::storage::StorageError> {
/// let storage = Storage::in_memory();
/// let batch = Batch::default()
///     .set(&Slot::Token, "jwt")?
///     .clear(&Slot::User)?;
/// storage.apply(batch)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Batch {
    scope: Option<SlotScope>,
    writes: Vec<StoreWrite>,
}

impl Batch {
    /// Add a write of `value` to `slot`
    pub fn set<T: Serialize + ?Sized>(mut self, slot: &Slot, value: &T) -> StorageResult<Self> {
        let value = serde_json::to_string(value)?;
        self.push(slot, StoreWrite::Set { key: slot.key().into_owned(), value })?;
        Ok(self)
    }

    /// Add a removal of `slot`
    pub fn clear(mut self, slot: &Slot) -> StorageResult<Self> {
        self.push(slot, StoreWrite::Remove { key: slot.key().into_owned() })?;
        Ok(self)
    }

    fn push(&mut self, slot: &Slot, write: StoreWrite) -> StorageResult<()> {
        match self.scope {
            Some(scope) if scope != slot.scope() => {
                return Err(StorageError::MixedScopes(slot.key().into_owned()));
            }
            _ => self.scope = Some(slot.scope()),
        }
        self.writes.push(write);
        Ok(())
    }
}

/// Slot-aware storage facade over a durable and a session-scoped backend
#[derive(Clone)]
pub struct Storage {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Storage {
    /// Create storage from a durable and a session-scoped backend
    pub fn new(
        durable: impl KeyValueStore + 'static,
        session: impl KeyValueStore + 'static,
    ) -> Self {
        Self {
            durable: Arc::new(durable),
            session: Arc::new(session),
        }
    }

    /// Storage where both scopes are in memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), MemoryStore::new())
    }

    fn backend(&self, slot: &Slot) -> &dyn KeyValueStore {
        match slot.scope() {
            SlotScope::Durable => self.durable.as_ref(),
            SlotScope::Session => self.session.as_ref(),
        }
    }

    /// Read and deserialize the value in `slot`
    pub fn get<T: DeserializeOwned>(&self, slot: &Slot) -> StorageResult<Option<T>> {
        self.backend(slot)
            .get(&slot.key())?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    /// Serialize and store `value` in `slot`
    pub fn set<T: Serialize + ?Sized>(&self, slot: &Slot, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend(slot).set(&slot.key(), raw)
    }

    /// Read the value in `slot` and remove it in the same step
    ///
    /// The slot is emptied even when the stored value fails to deserialize.
    pub fn take<T: DeserializeOwned>(&self, slot: &Slot) -> StorageResult<Option<T>> {
        self.backend(slot)
            .remove(&slot.key())?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    /// Empty `slot`
    pub fn clear(&self, slot: &Slot) -> StorageResult<()> {
        self.backend(slot).remove(&slot.key()).map(|_| ())
    }

    /// Apply every write in `batch` as one unit
    pub fn apply(&self, batch: Batch) -> StorageResult<()> {
        let backend = match batch.scope {
            Some(SlotScope::Durable) => self.durable.as_ref(),
            Some(SlotScope::Session) => self.session.as_ref(),
            None => return Ok(()),
        };
        backend.apply(batch.writes)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error while reading or writing the durable store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured path cannot hold a store
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    /// A batch mixed durable and session slots
    #[error("Slot {0} does not share the batch scope")]
    MixedScopes(String),
}
