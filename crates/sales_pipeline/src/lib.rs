//! Cleaning pipeline for rolling-sales exports.
//!
//! Loads a raw labelled CSV, runs the validity pass, removes duplicate rows
//! and always-empty columns, persists the result and returns it as re-loaded
//! from disk.
//!
//! # Example
//!
//! ```no_run
//! use sales_core::PipelineConfig;
//! use sales_pipeline::CleaningPipeline;
//!
//! let config = PipelineConfig::builder()
//!     .source("data/nyc-rolling-sales.csv")
//!     .destination("data/cleaned_data.csv")
//!     .build()
//!     .unwrap();
//!
//! let (cleaned, report) = CleaningPipeline::new(config).unwrap().clean().unwrap();
//! println!("{} rows kept, {} duplicates", cleaned.len(), report.duplicates_removed);
//! ```

mod clean;
mod csv_io;
mod error;
mod retry;

pub use clean::{clean, CleaningPipeline, CleaningReport};
pub use csv_io::{load_csv, write_csv};
pub use error::{PipelineError, Result};
pub use retry::RetryPolicy;
