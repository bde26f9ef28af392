//! Error types for validation operations.
//!
//! Only structural problems surface here. Type and domain violations are
//! data-quality events handled by dropping rows and never become errors.

use sales_core::CoreError;
use thiserror::Error;

/// Errors that abort a validation pass.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A rule references a column the dataset does not have
    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    /// The rule set itself is malformed
    #[error(transparent)]
    InvalidRuleSet(#[from] CoreError),
}

impl ValidationError {
    /// Creates a new schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaError(message.into())
    }

    /// Creates a schema error for an absent column.
    pub fn missing_column(column: &str) -> Self {
        Self::schema(format!(
            "cannot check column '{column}', because it does not exist"
        ))
    }
}
