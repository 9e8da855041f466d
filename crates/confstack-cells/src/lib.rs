//! # Confstack Cells
//!
//! Layered access to single configuration values. A cell exposes `get`/`set`
//! over one value; leaf cells bind the value in memory or at a fixed
//! [`ValueStore`](confstack_store::ValueStore) path, and layering cells wrap
//! a lower cell to add read caching, write deduplication, yes/no boolean
//! translation, and draft/commit staging. A [`CellGroup`] commits several
//! staged cells in order and signals the store once when anything changed.
//!
//! The stack an importer builds per boolean sysconfig flag:
//!
//! ```
//! use std::sync::Arc;
//! use confstack_cells::{sysconfig_flag, ConfigCell, Stageable};
//! use confstack_store::MemoryStore;
//! use serde_json::Value;
//!
//! # fn main() -> confstack_cells::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let mut flag = sysconfig_flag(store, ".network.NETWORKING");
//!
//! flag.set(Value::Bool(true))?;          // draft only, store untouched
//! assert_eq!(flag.get()?, Value::Bool(true));
//! assert!(flag.commit()?);               // "yes" lands in the store
//! # Ok(())
//! # }
//! ```

pub mod caching;
pub mod cell;
pub mod error;
pub mod group;
pub mod staging;
pub mod yesno;

pub use caching::{ReadCacheCell, WriteCacheCell};
pub use cell::{ConfigCell, MemoryCell, StoreCell};
pub use error::{CellError, Result};
pub use group::CellGroup;
pub use staging::{sysconfig_flag, Stageable, StagingCell, SysconfigFlag};
pub use yesno::YesNoCell;
