//! Error types for the core crate.
//!
//! [`CoercionFailure`] is the only error that is expected during a normal run;
//! the column validators absorb it by dropping the row. [`CoreError`] covers
//! malformed configuration and rule definitions.

use crate::{ColumnType, DataValue};
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type for core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A rule set definition is malformed
    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(String),

    /// Pipeline or serving configuration is malformed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Creates a new rule set error.
    pub fn rule_set(message: impl Into<String>) -> Self {
        Self::InvalidRuleSet(message.into())
    }

    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// A single value could not be converted to its declared column type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Cannot coerce {actual} value '{value}' to {target}")]
pub struct CoercionFailure {
    /// Rendered source value
    pub value: String,
    /// Type name of the source value
    pub actual: &'static str,
    /// Requested type
    pub target: ColumnType,
}

impl CoercionFailure {
    /// Creates a failure for `value` and the requested `target` type.
    pub fn new(value: &DataValue, target: ColumnType) -> Self {
        Self {
            value: value.render(),
            actual: value.type_name(),
            target,
        }
    }
}
