//! Translation between tri-state booleans and "yes"/"no" strings
//!
//! Sysconfig files encode switches as the strings `"yes"` and `"no"`; the
//! editing layers above want `true`, `false`, or absent. [`YesNoCell`]
//! converts between the two on every access.

use serde_json::Value;

use crate::{
    cell::ConfigCell,
    error::{CellError, Result},
};

/// Cell translating a lower `"yes"`/`"no"` string value to booleans.
///
/// Reading maps `"yes"`→`true` and `"no"`→`false`; an absent lower value
/// maps to the configured `for_absent`, anything else to `for_other`.
/// Writing accepts only `true`, `false` and `Null` — other values are
/// rejected before the lower cell is touched.
pub struct YesNoCell<C> {
    lower: C,
    for_absent: Option<bool>,
    for_other: Option<bool>,
}

impl<C: ConfigCell> YesNoCell<C> {
    /// Wrap `lower` with the default fallbacks: absent stays absent,
    /// unrecognized strings read as `false`
    pub fn new(lower: C) -> Self {
        Self::with_fallbacks(lower, None, Some(false))
    }

    /// Wrap `lower` choosing what an absent (`for_absent`) and what an
    /// unrecognized (`for_other`) lower value should read as
    pub fn with_fallbacks(lower: C, for_absent: Option<bool>, for_other: Option<bool>) -> Self {
        Self {
            lower,
            for_absent,
            for_other,
        }
    }
}

fn tri(choice: Option<bool>) -> Value {
    match choice {
        Some(b) => Value::Bool(b),
        None => Value::Null,
    }
}

impl<C: ConfigCell> ConfigCell for YesNoCell<C> {
    fn get(&mut self) -> Result<Value> {
        let value = match self.lower.get()? {
            Value::String(s) if s == "yes" => Value::Bool(true),
            Value::String(s) if s == "no" => Value::Bool(false),
            Value::Null => tri(self.for_absent),
            _ => tri(self.for_other),
        };
        Ok(value)
    }

    fn set(&mut self, value: Value) -> Result<Value> {
        let encoded = match &value {
            Value::Bool(true) => Value::String("yes".to_string()),
            Value::Bool(false) => Value::String("no".to_string()),
            Value::Null => Value::Null,
            _ => return Err(CellError::UnsupportedValue { value }),
        };
        self.lower.set(encoded)?;
        Ok(value)
    }
}
