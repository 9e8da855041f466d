//! # Confstack Store
//!
//! The persistence seam for the confstack cell stack: a dotted-path
//! key/value interface plus two backends, an in-memory store for tests and
//! one-shot import sessions and a sysconfig-file store that buffers edits
//! and flushes whole files on demand.

pub mod error;
pub mod path;
pub mod store;
pub mod sysconfig;

pub use error::{IoOperation, StoreError, StoreResult};
pub use path::StorePath;
pub use store::{MemoryStore, ValueStore};
pub use sysconfig::SysconfigStore;
