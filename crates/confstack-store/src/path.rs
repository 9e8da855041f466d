//! Dotted hierarchical keys addressing values in a store

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hierarchical key into a [`ValueStore`](crate::ValueStore).
///
/// Written in dotted form, e.g. `.network.NETWORKING`. A leading dot is
/// accepted on input and normalized away; equality is plain segment
/// equality. The cell stack treats paths as opaque, only the store backends
/// interpret their segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorePath {
    raw: String,
}

impl StorePath {
    /// Create a path from its dotted form
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let raw = raw.strip_prefix('.').unwrap_or(&raw).to_string();
        Self { raw }
    }

    /// The dotted form without the leading dot
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Iterate over the path segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.').filter(|s| !s.is_empty())
    }

    /// The last segment, if any
    pub fn last(&self) -> Option<&str> {
        self.segments().last()
    }

    /// The path with the last segment removed; `None` for a root or
    /// single-segment path
    pub fn parent(&self) -> Option<StorePath> {
        let idx = self.raw.rfind('.')?;
        Some(StorePath {
            raw: self.raw[..idx].to_string(),
        })
    }

    /// Append one segment
    pub fn join(&self, segment: &str) -> StorePath {
        if self.raw.is_empty() {
            StorePath::new(segment)
        } else {
            StorePath {
                raw: format!("{}.{}", self.raw, segment),
            }
        }
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.raw)
    }
}

impl From<&str> for StorePath {
    fn from(raw: &str) -> Self {
        StorePath::new(raw)
    }
}

impl From<String> for StorePath {
    fn from(raw: String) -> Self {
        StorePath::new(raw)
    }
}
