//! Column specifications and rule sets.
//!
//! A [`RuleSet`] is the ordered list of columns the validity pass walks, plus
//! the columns known to be empty that the cleaning pipeline drops. The NYC
//! rolling-sales rule set ships built in; others can be parsed from YAML or
//! TOML files.

use crate::{ColumnType, CoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Borough code column.
pub const BOROUGH: &str = "BOROUGH";
/// Sale price column.
pub const SALE_PRICE: &str = "SALE PRICE";
/// Column that is always empty in the NYC export.
pub const EASE_MENT: &str = "EASE-MENT";

/// Valid borough codes (Manhattan, Bronx, Brooklyn, Queens, Staten Island).
pub const BOROUGH_CODES: [i64; 5] = [1, 2, 3, 4, 5];
/// Lowest sale price kept by the built-in rule set.
pub const SALE_PRICE_MIN: f64 = 1_000.0;
/// Highest sale price kept by the built-in rule set.
pub const SALE_PRICE_MAX: f64 = 100_000_000.0;

/// Bounded-domain constraint applied after the type check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnConstraint {
    /// Value must be one of an enumerated set of integer codes
    AllowedValues {
        /// Valid codes
        values: Vec<i64>,
    },

    /// Numeric value must lie in `[min, max]`
    Range {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },
}

/// A single column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as it appears in the CSV header
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional bounded-domain constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<ColumnConstraint>,
}

/// Ordered validity rules for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule set name
    pub name: String,

    /// Columns in the order they are checked
    pub columns: Vec<ColumnSpec>,

    /// Columns known to be empty, removed after validation
    #[serde(default)]
    pub drop_columns: Vec<String>,
}

impl RuleSet {
    /// The 18-column rule set for the NYC rolling-sales export.
    pub fn nyc_rolling_sales() -> Self {
        RuleSetBuilder::new("nyc_rolling_sales")
            .column(
                ColumnBuilder::integer(BOROUGH)
                    .description("Borough code")
                    .constraint(ColumnConstraint::AllowedValues {
                        values: BOROUGH_CODES.to_vec(),
                    })
                    .build(),
            )
            .string("NEIGHBORHOOD")
            .string("BUILDING CLASS CATEGORY")
            .string("TAX CLASS AT PRESENT")
            .integer("BLOCK")
            .integer("LOT")
            .string("BUILDING CLASS AT PRESENT")
            .integer("ZIP CODE")
            .integer("RESIDENTIAL UNITS")
            .integer("COMMERCIAL UNITS")
            .integer("TOTAL UNITS")
            .float("LAND SQUARE FEET")
            .float("GROSS SQUARE FEET")
            .integer("YEAR BUILT")
            .string("TAX CLASS AT TIME OF SALE")
            .string("BUILDING CLASS AT TIME OF SALE")
            .column(
                ColumnBuilder::float(SALE_PRICE)
                    .description("Sale price in USD")
                    .constraint(ColumnConstraint::Range {
                        min: SALE_PRICE_MIN,
                        max: SALE_PRICE_MAX,
                    })
                    .build(),
            )
            .string("SALE DATE")
            .drop_column(EASE_MENT)
            .build()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the checked columns, in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Checks that the rule set is well formed.
    pub fn validate_definition(&self) -> Result<(), CoreError> {
        if self.columns.is_empty() {
            return Err(CoreError::rule_set("rule set has no columns defined"));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return Err(CoreError::rule_set("column name cannot be empty"));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(CoreError::rule_set(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }

            match &column.constraint {
                Some(ColumnConstraint::AllowedValues { values }) if values.is_empty() => {
                    return Err(CoreError::rule_set(format!(
                        "column '{}' has an empty allowed set",
                        column.name
                    )));
                }
                Some(ColumnConstraint::AllowedValues { .. })
                    if column.column_type != ColumnType::Integer =>
                {
                    return Err(CoreError::rule_set(format!(
                        "allowed values on column '{}' require an integer column",
                        column.name
                    )));
                }
                Some(ColumnConstraint::Range { min, max }) if min > max => {
                    return Err(CoreError::rule_set(format!(
                        "column '{}' has range [{}, {}] with min above max",
                        column.name, min, max
                    )));
                }
                Some(ColumnConstraint::Range { .. })
                    if column.column_type == ColumnType::String =>
                {
                    return Err(CoreError::rule_set(format!(
                        "range on column '{}' requires a numeric column",
                        column.name
                    )));
                }
                _ => {}
            }
        }

        if let Some(name) = self.drop_columns.iter().find(|d| seen.contains(d.as_str())) {
            return Err(CoreError::rule_set(format!(
                "column '{}' is both checked and dropped",
                name
            )));
        }

        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::nyc_rolling_sales()
    }
}

/// Builder for a single [`ColumnSpec`].
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    spec: ColumnSpec,
}

impl ColumnBuilder {
    /// Starts a column with the given type.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            spec: ColumnSpec {
                name: name.into(),
                column_type,
                description: None,
                constraint: None,
            },
        }
    }

    /// Starts a string column.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    /// Starts an integer column.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    /// Starts a float column.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Float)
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    /// Sets the bounded-domain constraint.
    pub fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.spec.constraint = Some(constraint);
        self
    }

    /// Builds the column.
    pub fn build(self) -> ColumnSpec {
        self.spec
    }
}

/// Builder for a [`RuleSet`].
///
/// # Example
///
/// ```rust
/// use sales_core::RuleSetBuilder;
///
/// let rules = RuleSetBuilder::new("listings")
///     .integer("ID")
///     .string("STREET")
///     .drop_column("NOTES")
///     .build();
///
/// assert_eq!(rules.columns.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    name: String,
    columns: Vec<ColumnSpec>,
    drop_columns: Vec<String>,
}

impl RuleSetBuilder {
    /// Creates a builder for a rule set called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a column.
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends an unconstrained string column.
    pub fn string(self, name: impl Into<String>) -> Self {
        self.column(ColumnBuilder::string(name).build())
    }

    /// Appends an unconstrained integer column.
    pub fn integer(self, name: impl Into<String>) -> Self {
        self.column(ColumnBuilder::integer(name).build())
    }

    /// Appends an unconstrained float column.
    pub fn float(self, name: impl Into<String>) -> Self {
        self.column(ColumnBuilder::float(name).build())
    }

    /// Marks a column as known-empty.
    pub fn drop_column(mut self, name: impl Into<String>) -> Self {
        self.drop_columns.push(name.into());
        self
    }

    /// Builds the rule set.
    pub fn build(self) -> RuleSet {
        RuleSet {
            name: self.name,
            columns: self.columns,
            drop_columns: self.drop_columns,
        }
    }
}
