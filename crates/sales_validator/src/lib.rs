//! # Rolling Sales Validator
//!
//! Validation and cleaning engine for tabular sales data. This crate checks a
//! [`DataSet`](sales_core::DataSet) against an ordered
//! [`RuleSet`](sales_core::RuleSet) and repairs it:
//!
//! - Null checks (rows with missing values are dropped)
//! - Type checks (values are coerced to the declared type or dropped)
//! - Domain checks (integer codes outside an enumerated set are dropped)
//! - Range checks (numbers outside `[min, max]` are dropped)
//!
//! Rows are only ever removed or coerced, never added.
//!
//! ## Example
//!
//! ```rust
//! use sales_core::{ColumnType, DataRow, DataSet, DataValue};
//! use sales_validator::validate_number;
//!
//! let rows = vec![
//!     DataRow::from([("BLOCK".to_string(), DataValue::from("392"))]),
//!     DataRow::from([("BLOCK".to_string(), DataValue::from("n/a"))]),
//! ];
//! let dataset = DataSet::from_rows(["BLOCK"], rows);
//!
//! let cleaned = validate_number(dataset, "BLOCK", ColumnType::Integer).unwrap();
//! assert_eq!(cleaned.len(), 1);
//! assert_eq!(cleaned.value(0, "BLOCK"), Some(&DataValue::Int(392)));
//! ```

mod engine;
mod error;
mod fields;
mod rules;

pub use engine::*;
pub use error::*;
pub use fields::*;
pub use rules::*;
