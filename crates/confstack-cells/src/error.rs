//! Cell error types

use serde_json::Value;
use thiserror::Error;

use confstack_store::StoreError;

/// Result type for cell operations
pub type Result<T> = std::result::Result<T, CellError>;

/// Errors surfaced by the cell stack
#[derive(Debug, Error)]
pub enum CellError {
    /// The backing store failed; propagated unchanged, never retried
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A value the yes/no translating cell cannot encode
    #[error("cannot translate {value} into a yes/no setting")]
    UnsupportedValue { value: Value },
}
