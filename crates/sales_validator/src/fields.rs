//! Field validators.
//!
//! Each validator walks one column through a fixed sequence of rules. Nulls
//! are removed first, so coercion never sees a missing value; a value that
//! cannot be coerced is treated as missing and its row is dropped. Domain and
//! range violations drop the row without any coercion.

use crate::{InRange, InSet, NotNull, Rule, TypeOf, ValidationError, ViolationKind};
use sales_core::{ColumnType, DataSet};
use std::fmt;
use tracing::{debug, info};

/// One failed check, as reported by verbose diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Column the rule ran on
    pub column: String,
    /// Violation category
    pub kind: ViolationKind,
    /// Rows that failed the check
    pub rows_flagged: usize,
    /// Rows removed while repairing
    pub rows_dropped: usize,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} flagged, {} dropped)",
            self.message, self.rows_flagged, self.rows_dropped
        )
    }
}

/// Applies column rules to a dataset and records what they found.
#[derive(Debug, Default)]
pub struct FieldValidator {
    verbose: bool,
    violations: Vec<Violation>,
}

impl FieldValidator {
    /// Creates a silent field validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables one diagnostic line per violation.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Violations recorded so far, in the order they happened.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Takes the recorded violations, leaving the list empty.
    pub fn take_violations(&mut self) -> Vec<Violation> {
        std::mem::take(&mut self.violations)
    }

    /// Checks one rule and repairs the dataset if it fails.
    ///
    /// Returns the number of rows removed.
    pub fn apply(
        &mut self,
        dataset: &mut DataSet,
        column: &str,
        rule: &dyn Rule,
    ) -> Result<usize, ValidationError> {
        let outcome = rule.check(dataset, column)?;
        if outcome.success() {
            return Ok(0);
        }

        let dropped = rule.repair(dataset, column, &outcome);
        let violation = Violation {
            column: column.to_string(),
            kind: rule.kind(),
            rows_flagged: outcome.unexpected_count(),
            rows_dropped: dropped,
            message: rule.describe(column),
        };

        if self.verbose {
            info!(column, category = %violation.kind, dropped, "{}", violation.message);
        } else {
            debug!(column, category = %violation.kind, dropped, "{}", violation.message);
        }

        self.violations.push(violation);
        Ok(dropped)
    }

    /// Ensures `column` holds non-null strings.
    ///
    /// Null rows are removed; other values are rendered as text.
    pub fn validate_string(
        &mut self,
        dataset: &mut DataSet,
        column: &str,
    ) -> Result<usize, ValidationError> {
        self.validate_typed(dataset, column, ColumnType::String)
    }

    /// Ensures `column` holds non-null numbers of `kind`.
    ///
    /// Null rows are removed; other values are parsed as `kind` and rows that
    /// fail to parse are removed.
    pub fn validate_number(
        &mut self,
        dataset: &mut DataSet,
        column: &str,
        kind: ColumnType,
    ) -> Result<usize, ValidationError> {
        if kind == ColumnType::String {
            return Err(ValidationError::schema(format!(
                "column '{column}' cannot be validated as a number of type string"
            )));
        }
        self.validate_typed(dataset, column, kind)
    }

    /// Drops rows whose `column` value is not one of `allowed`.
    pub fn validate_bounded_domain(
        &mut self,
        dataset: &mut DataSet,
        column: &str,
        allowed: &[i64],
    ) -> Result<usize, ValidationError> {
        self.apply(dataset, column, &InSet::new(allowed))
    }

    /// Drops rows whose `column` value falls outside `[min, max]`.
    pub fn validate_bounded_range(
        &mut self,
        dataset: &mut DataSet,
        column: &str,
        min: f64,
        max: f64,
    ) -> Result<usize, ValidationError> {
        self.apply(dataset, column, &InRange::new(min, max))
    }

    fn validate_typed(
        &mut self,
        dataset: &mut DataSet,
        column: &str,
        column_type: ColumnType,
    ) -> Result<usize, ValidationError> {
        let nulls = self.apply(dataset, column, &NotNull)?;
        let mismatched = self.apply(dataset, column, &TypeOf::new(column_type))?;
        Ok(nulls + mismatched)
    }
}

/// Ensures `column` holds non-null strings. See [`FieldValidator::validate_string`].
pub fn validate_string(mut dataset: DataSet, column: &str) -> Result<DataSet, ValidationError> {
    FieldValidator::new().validate_string(&mut dataset, column)?;
    Ok(dataset)
}

/// Ensures `column` holds non-null numbers. See [`FieldValidator::validate_number`].
pub fn validate_number(
    mut dataset: DataSet,
    column: &str,
    kind: ColumnType,
) -> Result<DataSet, ValidationError> {
    FieldValidator::new().validate_number(&mut dataset, column, kind)?;
    Ok(dataset)
}

/// Keeps rows whose `column` is in `allowed`. See [`FieldValidator::validate_bounded_domain`].
pub fn validate_bounded_domain(
    mut dataset: DataSet,
    column: &str,
    allowed: &[i64],
) -> Result<DataSet, ValidationError> {
    FieldValidator::new().validate_bounded_domain(&mut dataset, column, allowed)?;
    Ok(dataset)
}

/// Keeps rows whose `column` is in `[min, max]`. See [`FieldValidator::validate_bounded_range`].
pub fn validate_bounded_range(
    mut dataset: DataSet,
    column: &str,
    min: f64,
    max: f64,
) -> Result<DataSet, ValidationError> {
    FieldValidator::new().validate_bounded_range(&mut dataset, column, min, max)?;
    Ok(dataset)
}
