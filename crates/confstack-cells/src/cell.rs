//! The cell capability and the leaf cells
//!
//! Every layer of the stack speaks [`ConfigCell`]; composition is by
//! ownership, each layering cell exclusively owns the one lower cell it
//! wraps. The two leaves here either hold the value in memory or forward
//! verbatim to a [`ValueStore`] path.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use confstack_store::{StorePath, ValueStore};

use crate::error::Result;

/// Read/write capability over a single configuration value.
///
/// `Value::Null` models an absent value throughout the stack; equality of
/// values is structural, Null included.
pub trait ConfigCell {
    /// Current value, `Value::Null` when nothing is set
    fn get(&mut self) -> Result<Value>;

    /// Store `value`, returning it
    fn set(&mut self, value: Value) -> Result<Value>;
}

impl<C: ConfigCell + ?Sized> ConfigCell for Box<C> {
    fn get(&mut self) -> Result<Value> {
        (**self).get()
    }

    fn set(&mut self, value: Value) -> Result<Value> {
        (**self).set(value)
    }
}

/// Plain in-memory cell; also the draft holder used by staging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCell {
    value: Value,
}

impl MemoryCell {
    /// Create a cell holding `Value::Null`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell holding `value`
    pub fn with_value(value: Value) -> Self {
        Self { value }
    }
}

impl ConfigCell for MemoryCell {
    fn get(&mut self) -> Result<Value> {
        Ok(self.value.clone())
    }

    fn set(&mut self, value: Value) -> Result<Value> {
        self.value = value.clone();
        Ok(value)
    }
}

/// Cell forwarding every access to a fixed store path.
///
/// No caching here: each `get` is a store read and each `set` a store
/// write, with store errors propagated unchanged.
pub struct StoreCell {
    store: Arc<dyn ValueStore>,
    path: StorePath,
}

impl StoreCell {
    /// Bind a cell to `path` in `store`
    pub fn new(store: Arc<dyn ValueStore>, path: impl Into<StorePath>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    /// The store path this cell is bound to
    pub fn path(&self) -> &StorePath {
        &self.path
    }
}

impl ConfigCell for StoreCell {
    fn get(&mut self) -> Result<Value> {
        let value = self.store.read(&self.path)?;
        debug!("Store cell read {}: {}", self.path, value);
        Ok(value)
    }

    fn set(&mut self, value: Value) -> Result<Value> {
        debug!("Store cell write {}: {}", self.path, value);
        self.store.write(&self.path, value.clone())?;
        Ok(value)
    }
}
