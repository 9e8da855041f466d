//! Draft/commit staging over a production cell
//!
//! A [`StagingCell`] separates "user is editing" from "persist to the
//! backing store": `set` writes only an in-memory draft, and an explicit
//! [`commit`](Stageable::commit) flushes the draft to the production cell
//! when it differs from what production currently holds.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use confstack_store::{StorePath, ValueStore};

use crate::{
    caching::WriteCacheCell,
    cell::{ConfigCell, MemoryCell, StoreCell},
    error::Result,
    yesno::YesNoCell,
};

/// Commit/reset capability of a staged cell; what a
/// [`CellGroup`](crate::CellGroup) manages its members through.
pub trait Stageable {
    /// Flush the draft to production if it differs.
    ///
    /// # Returns
    ///
    /// `true` when a production write actually happened. Committing never
    /// discards the draft, not even when production already matched it —
    /// only [`reset`](Stageable::reset) does.
    fn commit(&mut self) -> Result<bool>;

    /// Discard the draft unconditionally
    fn reset(&mut self);
}

/// Cell staging edits in a draft until they are committed.
///
/// Reads prefer the draft when one exists; `set` creates the draft and
/// never touches production. Production is only read during a commit, and
/// only when a draft is present.
pub struct StagingCell<P> {
    production: P,
    draft: Option<MemoryCell>,
}

impl<P: ConfigCell> StagingCell<P> {
    /// Stage edits over `production`, starting clean
    pub fn new(production: P) -> Self {
        Self {
            production,
            draft: None,
        }
    }

    /// Whether an uncommitted draft exists
    pub fn is_dirty(&self) -> bool {
        self.draft.is_some()
    }
}

impl<P: ConfigCell> ConfigCell for StagingCell<P> {
    fn get(&mut self) -> Result<Value> {
        match self.draft.as_mut() {
            Some(draft) => draft.get(),
            None => self.production.get(),
        }
    }

    fn set(&mut self, value: Value) -> Result<Value> {
        self.draft.get_or_insert_with(MemoryCell::new).set(value)
    }
}

impl<P: ConfigCell> Stageable for StagingCell<P> {
    fn commit(&mut self) -> Result<bool> {
        let Some(draft) = self.draft.as_mut() else {
            return Ok(false);
        };
        let staged = draft.get()?;
        if self.production.get()? == staged {
            debug!("Commit skipped, production already holds the staged value");
            return Ok(false);
        }
        self.production.set(staged)?;
        debug!("Committed staged value to production");
        Ok(true)
    }

    fn reset(&mut self) {
        self.draft = None;
    }
}

/// The stack sysconfig importers build per boolean flag: staged edits over
/// a yes/no translation over a deduplicating cache over the store.
pub type SysconfigFlag = StagingCell<YesNoCell<WriteCacheCell<StoreCell>>>;

/// Assemble a [`SysconfigFlag`] bound to `path` in `store`
pub fn sysconfig_flag(store: Arc<dyn ValueStore>, path: impl Into<StorePath>) -> SysconfigFlag {
    StagingCell::new(YesNoCell::new(WriteCacheCell::new(StoreCell::new(
        store, path,
    ))))
}
