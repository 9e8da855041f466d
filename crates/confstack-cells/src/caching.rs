//! Read caching and write deduplication over a lower cell
//!
//! [`ReadCacheCell`] consults the lower cell once and serves later reads
//! from memory; [`WriteCacheCell`] extends that by skipping writes whose
//! value the cache already holds. The cache slot is an `Option<Value>`, so
//! a cached `Null` or `false` is cleanly distinct from "nothing observed
//! yet" — truthiness of the value is never consulted.

use serde_json::Value;
use tracing::debug;

use crate::{cell::ConfigCell, error::Result};

/// Cell memoizing the first read of its lower cell.
///
/// Writes always pass through and refresh the cache; deduplication is the
/// job of [`WriteCacheCell`].
pub struct ReadCacheCell<C> {
    lower: C,
    cached: Option<Value>,
}

impl<C: ConfigCell> ReadCacheCell<C> {
    /// Wrap `lower` with an empty cache
    pub fn new(lower: C) -> Self {
        Self {
            lower,
            cached: None,
        }
    }

    /// The cached value, if any access has populated the cache
    pub fn cached(&self) -> Option<&Value> {
        self.cached.as_ref()
    }
}

impl<C: ConfigCell> ConfigCell for ReadCacheCell<C> {
    fn get(&mut self) -> Result<Value> {
        if let Some(value) = &self.cached {
            return Ok(value.clone());
        }
        let value = self.lower.get()?;
        self.cached = Some(value.clone());
        Ok(value)
    }

    fn set(&mut self, value: Value) -> Result<Value> {
        self.cached = Some(value.clone());
        self.lower.set(value)
    }
}

/// Cell that also eliminates redundant writes.
///
/// `set` of a value equal to the cached one returns without touching the
/// lower cell, so N identical writes after any access collapse into one.
pub struct WriteCacheCell<C> {
    cache: ReadCacheCell<C>,
}

impl<C: ConfigCell> WriteCacheCell<C> {
    /// Wrap `lower` with an empty read/write cache
    pub fn new(lower: C) -> Self {
        Self {
            cache: ReadCacheCell::new(lower),
        }
    }
}

impl<C: ConfigCell> ConfigCell for WriteCacheCell<C> {
    fn get(&mut self) -> Result<Value> {
        self.cache.get()
    }

    fn set(&mut self, value: Value) -> Result<Value> {
        if self.cache.cached() == Some(&value) {
            debug!("Skipping write, cached value is unchanged");
            return Ok(value);
        }
        self.cache.set(value)
    }
}
