//! # Rolling Sales Core
//!
//! Core data structures for the rolling-sales data-quality pipeline.
//!
//! - **DataSet / DataValue**: the in-memory table the validators operate on
//! - **RuleSet / ColumnSpec**: ordered per-column type and domain rules
//! - **coerce**: best-effort conversion of a value to a column type
//! - **PipelineConfig / ServingConfig**: explicit run configuration
//!
//! ## Example
//!
//! ```rust
//! use sales_core::{coerce, ColumnType, DataValue, RuleSet};
//!
//! let rules = RuleSet::nyc_rolling_sales();
//! assert_eq!(rules.columns.len(), 18);
//!
//! let price = coerce(&DataValue::from("250000"), ColumnType::Float).unwrap();
//! assert_eq!(price, DataValue::Float(250000.0));
//! ```

pub mod coerce;
pub mod config;
pub mod dataset;
pub mod error;
pub mod schema;

pub use coerce::*;
pub use config::*;
pub use dataset::*;
pub use error::*;
pub use schema::*;
