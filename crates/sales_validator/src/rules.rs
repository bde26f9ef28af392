//! Per-column rules.
//!
//! A [`Rule`] inspects one column and reports the offending rows in an
//! [`Outcome`]. When the check fails the rule repairs the dataset: most rules
//! drop the offending rows, [`TypeOf`] first tries to coerce them.
//!
//! - NotNull: value must be present
//! - TypeOf: value must carry the declared column type
//! - InSet: integer value must belong to an enumerated set
//! - InRange: numeric value must lie in `[min, max]`

use crate::ValidationError;
use sales_core::{coerce, ColumnType, DataSet, DataValue};
use std::fmt;
use tracing::trace;

/// Category of a rule violation, reported by verbose diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Missing value
    Null,
    /// Value of the wrong type
    TypeMismatch,
    /// Value outside an enumerated set
    DomainViolation,
    /// Value outside a numeric range
    RangeViolation,
}

impl ViolationKind {
    /// Short machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Null => "null",
            ViolationKind::TypeMismatch => "type_mismatch",
            ViolationKind::DomainViolation => "domain_violation",
            ViolationKind::RangeViolation => "range_violation",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Positions of the rows that failed the check, ascending
    pub offending: Vec<usize>,
}

impl Outcome {
    /// Builds an outcome from the failing row positions.
    pub fn from_offending(offending: Vec<usize>) -> Self {
        Self { offending }
    }

    /// True when no row failed.
    pub fn success(&self) -> bool {
        self.offending.is_empty()
    }

    /// Number of failing rows.
    pub fn unexpected_count(&self) -> usize {
        self.offending.len()
    }
}

/// A check over a single column.
pub trait Rule: Send + Sync {
    /// Category reported when the check fails.
    fn kind(&self) -> ViolationKind;

    /// Human-readable description of the failure for `column`.
    fn describe(&self, column: &str) -> String;

    /// Returns true if a single value satisfies the rule.
    fn accepts(&self, value: &DataValue) -> bool;

    /// Checks every value of `column`.
    ///
    /// Fails with a schema error if the column is absent.
    fn check(&self, dataset: &DataSet, column: &str) -> Result<Outcome, ValidationError> {
        if !dataset.has_column(column) {
            return Err(ValidationError::missing_column(column));
        }

        let offending = dataset
            .column_values(column)
            .enumerate()
            .filter(|(_, value)| !self.accepts(value))
            .map(|(position, _)| position)
            .collect();

        Ok(Outcome::from_offending(offending))
    }

    /// Restores the rule after a failed check. Returns the rows removed.
    ///
    /// The default drops every offending row.
    fn repair(&self, dataset: &mut DataSet, _column: &str, outcome: &Outcome) -> usize {
        dataset.remove_rows(&outcome.offending)
    }
}

/// Value must not be null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

impl Rule for NotNull {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Null
    }

    fn describe(&self, column: &str) -> String {
        format!("Column {column} contains null values")
    }

    fn accepts(&self, value: &DataValue) -> bool {
        !value.is_null()
    }
}

/// Value must carry the declared type; repair coerces, then drops failures.
#[derive(Debug, Clone, Copy)]
pub struct TypeOf {
    /// Declared type
    pub column_type: ColumnType,
}

impl TypeOf {
    /// Creates a type rule.
    pub fn new(column_type: ColumnType) -> Self {
        Self { column_type }
    }
}

impl Rule for TypeOf {
    fn kind(&self) -> ViolationKind {
        ViolationKind::TypeMismatch
    }

    fn describe(&self, column: &str) -> String {
        format!("Column {column} is not of type {}", self.column_type)
    }

    fn accepts(&self, value: &DataValue) -> bool {
        value.is_of_type(self.column_type)
    }

    fn repair(&self, dataset: &mut DataSet, column: &str, _outcome: &Outcome) -> usize {
        let mut failed = Vec::new();
        let mut position = 0;

        dataset.map_column(column, |value| {
            let next = match coerce(value, self.column_type) {
                Ok(converted) => converted,
                Err(failure) => {
                    trace!(column, row = position, %failure, "coercion failed");
                    failed.push(position);
                    DataValue::Null
                }
            };
            position += 1;
            next
        });

        dataset.remove_rows(&failed)
    }
}

/// Integer value must belong to an enumerated set. No coercion.
#[derive(Debug, Clone)]
pub struct InSet {
    /// Allowed codes
    pub values: Vec<i64>,
}

impl InSet {
    /// Creates a set rule.
    pub fn new(values: &[i64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }
}

impl Rule for InSet {
    fn kind(&self) -> ViolationKind {
        ViolationKind::DomainViolation
    }

    fn describe(&self, column: &str) -> String {
        let allowed: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        format!(
            "Column {column} contains values outside [{}]",
            allowed.join(", ")
        )
    }

    fn accepts(&self, value: &DataValue) -> bool {
        let code = match value {
            DataValue::Int(i) => Some(*i),
            DataValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        };
        code.is_some_and(|c| self.values.contains(&c))
    }
}

/// Numeric value must lie in `[min, max]`. Non-numeric values fail.
#[derive(Debug, Clone, Copy)]
pub struct InRange {
    /// Minimum value (inclusive)
    pub min: f64,
    /// Maximum value (inclusive)
    pub max: f64,
}

impl InRange {
    /// Creates a range rule.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Rule for InRange {
    fn kind(&self) -> ViolationKind {
        ViolationKind::RangeViolation
    }

    fn describe(&self, column: &str) -> String {
        format!(
            "Column {column} contains values outside [{}, {}]",
            self.min, self.max
        )
    }

    fn accepts(&self, value: &DataValue) -> bool {
        value
            .as_float()
            .is_some_and(|v| v >= self.min && v <= self.max)
    }
}
