//! The value store seam and the in-memory backend

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{StoreError, StoreResult},
    path::StorePath,
};

/// Persisted key/value registry the cell stack talks to.
///
/// Reading a path nothing has written yields `Value::Null`. Methods take
/// `&self` so one handle can be shared across the cells of an edit session;
/// backends synchronize internally.
pub trait ValueStore {
    /// Read the value stored at `path`
    fn read(&self, path: &StorePath) -> StoreResult<Value>;

    /// Write `value` at `path`
    fn write(&self, path: &StorePath, value: Value) -> StoreResult<()>;
}

/// In-memory store backend.
///
/// Used by tests and by one-shot import sessions that assemble values
/// before handing them elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<StorePath, Value>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with initial entries
    pub fn with_entries(entries: impl IntoIterator<Item = (StorePath, Value)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }
}

impl ValueStore for MemoryStore {
    fn read(&self, path: &StorePath) -> StoreResult<Value> {
        let entries = self.entries.read().map_err(|_| StoreError::Lock)?;
        let value = entries.get(path).cloned().unwrap_or(Value::Null);
        debug!("Read {} from memory store: {}", path, value);
        Ok(value)
    }

    fn write(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        debug!("Write {} to memory store: {}", path, value);
        let mut entries = self.entries.write().map_err(|_| StoreError::Lock)?;
        entries.insert(path.clone(), value);
        Ok(())
    }
}
