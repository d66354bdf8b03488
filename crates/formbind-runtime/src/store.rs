#![forbid(unsafe_code)]

//! Backing-record stores.
//!
//! Forms never own their records' persistence. A [`RecordStore`] resolves a
//! record reference to the store's canonical copy and accepts writes from
//! whoever owns the save flow.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StoreError::MissingId` | `put` of a transient record | Returns error, store unchanged |
//! | `StoreError::Poisoned` | A writer panicked holding the lock | Returns error |
//! | `StoreError::Unavailable` | Backend offline | Returns error |
//! | Missing entry | Deleted or never stored | `get_by_id` returns `Ok(None)` |

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use formbind_core::{FormError, Record, RecordId};

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record has no identity to store it under.
    MissingId,
    /// The store's lock was poisoned.
    Poisoned,
    /// The backend cannot serve requests.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "record has no id"),
            Self::Poisoned => write!(f, "store lock poisoned"),
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for FormError {
    fn from(e: StoreError) -> Self {
        FormError::Store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write access to persisted records.
pub trait RecordStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// The canonical copy of `id`, or `None` if it no longer exists.
    fn get_by_id(&self, id: &RecordId) -> StoreResult<Option<Record>>;

    /// Insert or replace a record under its id.
    fn put(&self, record: Record) -> StoreResult<()>;

    /// Remove and return a record.
    fn remove(&self, id: &RecordId) -> StoreResult<Option<Record>>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, Record>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `records`; records without an id are skipped.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let map = records
            .into_iter()
            .filter_map(|r| r.id().cloned().map(|id| (id, r)))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().map(|g| g.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get_by_id(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        let guard = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn put(&self, record: Record) -> StoreResult<()> {
        let id = record.id().cloned().ok_or(StoreError::MissingId)?;
        let mut guard = self.records.write().map_err(|_| StoreError::Poisoned)?;
        guard.insert(id, record);
        Ok(())
    }

    fn remove(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        let mut guard = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.remove(id))
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("records", &self.len())
            .finish()
    }
}
