//! Store error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// Read/write of a backing file failed
    #[error("IO error on {path:?} ({operation:?}): {source}")]
    Io {
        path: PathBuf,
        operation: IoOperation,
        source: std::io::Error,
    },

    /// A line in a backing file could not be parsed
    #[error("Failed to parse {path:?}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The path does not address anything in this store
    #[error("Invalid store path {path}: {message}")]
    InvalidPath { path: String, message: String },

    /// A value this backend cannot represent
    #[error("Unsupported value at {path}: {message}")]
    UnsupportedValue { path: String, message: String },

    /// Internal lock poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Lock,
}

/// IO operation type for error context
#[derive(Debug, Clone, Copy)]
pub enum IoOperation {
    Read,
    Write,
    Create,
}

impl StoreError {
    /// Create an IO error with path and operation context
    pub fn io(path: PathBuf, operation: IoOperation, source: std::io::Error) -> Self {
        Self::Io {
            path,
            operation,
            source,
        }
    }

    /// Create a parse error for a line in a backing file
    pub fn parse(path: PathBuf, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path,
            line,
            message: message.into(),
        }
    }

    /// Create an invalid-path error
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-value error
    pub fn unsupported_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            path: path.into(),
            message: message.into(),
        }
    }
}
