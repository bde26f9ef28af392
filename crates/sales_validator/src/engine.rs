//! Validity orchestrator.
//!
//! This module provides the [`ValidityOrchestrator`] that walks a [`RuleSet`]
//! column by column, threading the dataset through each field validator in
//! the declared order.

use crate::{FieldValidator, ValidationError, Violation};
use sales_core::{ColumnConstraint, ColumnSpec, ColumnType, DataSet, RuleSet};
use std::time::Instant;
use tracing::{debug, info};

/// Summary of one validity pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Rows before the pass
    pub rows_in: usize,

    /// Rows after the pass
    pub rows_out: usize,

    /// Number of columns checked
    pub columns_checked: usize,

    /// Every failed check, in the order it happened
    pub violations: Vec<Violation>,

    /// Pass duration in milliseconds
    pub duration_ms: u64,
}

impl ValidationReport {
    /// Rows removed by the pass.
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_out
    }

    /// True when no check failed.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Rows dropped per column, in rule order. Columns with no drops are omitted.
    pub fn dropped_by_column(&self) -> Vec<(String, usize)> {
        let mut totals: Vec<(String, usize)> = Vec::new();
        for violation in self.violations.iter().filter(|v| v.rows_dropped > 0) {
            match totals.iter_mut().find(|(c, _)| *c == violation.column) {
                Some((_, total)) => *total += violation.rows_dropped,
                None => totals.push((violation.column.clone(), violation.rows_dropped)),
            }
        }
        totals
    }
}

/// Applies the full ordered rule set to a dataset.
///
/// # Example
///
/// ```rust
/// use sales_core::{DataRow, DataSet, DataValue, RuleSetBuilder};
/// use sales_validator::ValidityOrchestrator;
///
/// let rules = RuleSetBuilder::new("tiny").integer("ID").build();
/// let rows = vec![
///     DataRow::from([("ID".to_string(), DataValue::from("1"))]),
///     DataRow::from([("ID".to_string(), DataValue::Null)]),
/// ];
/// let dataset = DataSet::from_rows(["ID"], rows);
///
/// let orchestrator = ValidityOrchestrator::new(rules);
/// let (cleaned, report) = orchestrator.run(dataset).unwrap();
///
/// assert_eq!(cleaned.len(), 1);
/// assert_eq!(report.rows_dropped(), 1);
/// ```
#[derive(Debug)]
pub struct ValidityOrchestrator {
    rules: RuleSet,
    verbose: bool,
}

impl ValidityOrchestrator {
    /// Creates an orchestrator for `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            verbose: false,
        }
    }

    /// Creates an orchestrator for the built-in NYC rolling-sales rules.
    pub fn nyc_rolling_sales() -> Self {
        Self::new(RuleSet::nyc_rolling_sales())
    }

    /// Enables one diagnostic line per violation.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The rule set this orchestrator applies.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Fails if any column referenced by the rule set is absent from `dataset`.
    pub fn check_schema(&self, dataset: &DataSet) -> Result<(), ValidationError> {
        let missing: Vec<&str> = self
            .rules
            .column_names()
            .filter(|name| !dataset.has_column(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::schema(format!(
                "dataset is missing columns: {}",
                missing.join(", ")
            )))
        }
    }

    /// Runs every column rule in order and returns the cleaned dataset.
    ///
    /// The schema is checked before any row is touched, so a missing column
    /// aborts the pass without partial results.
    pub fn run(
        &self,
        mut dataset: DataSet,
    ) -> Result<(DataSet, ValidationReport), ValidationError> {
        let start = Instant::now();
        self.rules.validate_definition()?;
        self.check_schema(&dataset)?;

        let rows_in = dataset.len();
        info!(
            rules = %self.rules.name,
            rows = rows_in,
            columns = self.rules.columns.len(),
            "Running validity checks"
        );

        let mut validator = FieldValidator::new().with_verbose(self.verbose);
        for spec in &self.rules.columns {
            let dropped = Self::validate_column(&mut validator, &mut dataset, spec)?;
            debug!(column = %spec.name, dropped, remaining = dataset.len(), "Column checked");
        }

        let report = ValidationReport {
            rows_in,
            rows_out: dataset.len(),
            columns_checked: self.rules.columns.len(),
            violations: validator.take_violations(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            violations = report.violations.len(),
            "Validity checks finished"
        );

        Ok((dataset, report))
    }

    fn validate_column(
        validator: &mut FieldValidator,
        dataset: &mut DataSet,
        spec: &ColumnSpec,
    ) -> Result<usize, ValidationError> {
        let mut dropped = match spec.column_type {
            ColumnType::String => validator.validate_string(dataset, &spec.name)?,
            kind => validator.validate_number(dataset, &spec.name, kind)?,
        };

        dropped += match &spec.constraint {
            Some(ColumnConstraint::AllowedValues { values }) => {
                validator.validate_bounded_domain(dataset, &spec.name, values)?
            }
            Some(ColumnConstraint::Range { min, max }) => {
                validator.validate_bounded_range(dataset, &spec.name, *min, *max)?
            }
            None => 0,
        };

        Ok(dropped)
    }
}

impl Default for ValidityOrchestrator {
    fn default() -> Self {
        Self::nyc_rolling_sales()
    }
}
