//! The cleaning pipeline.
//!
//! One run loads the raw CSV, applies the validity pass, removes duplicate
//! rows and the always-empty columns, writes the result and loads it back so
//! the returned dataset carries exactly the types a fresh read produces.

use crate::{load_csv, write_csv, Result, RetryPolicy};
use chrono::{DateTime, Utc};
use sales_core::{DataSet, PipelineConfig, RuleSet};
use sales_parser::parse_rules_file;
use sales_validator::{ValidationReport, ValidityOrchestrator};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Statistics for one cleaning run.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    /// Raw CSV that was cleaned
    pub source: PathBuf,

    /// Where the cleaned CSV was written
    pub destination: PathBuf,

    /// Result of the validity pass
    pub validation: ValidationReport,

    /// Exact-duplicate rows removed after validation
    pub duplicates_removed: usize,

    /// Columns removed from the output
    pub dropped_columns: Vec<String>,

    /// Rows in the written file
    pub rows_written: usize,

    /// Run duration in milliseconds
    pub duration_ms: u64,

    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl CleaningReport {
    /// Rows read from the source.
    pub fn rows_loaded(&self) -> usize {
        self.validation.rows_in
    }

    /// Rows removed by validation and deduplication together.
    pub fn rows_removed(&self) -> usize {
        self.rows_loaded() - self.rows_written
    }
}

/// Runs the load, validate, deduplicate, persist, reload sequence.
#[derive(Debug)]
pub struct CleaningPipeline {
    config: PipelineConfig,
    orchestrator: ValidityOrchestrator,
}

impl CleaningPipeline {
    /// Creates a pipeline from `config`.
    ///
    /// The rule set named by `config.rules` is loaded here; without one the
    /// built-in NYC rolling-sales rules apply.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let rules = match &config.rules {
            Some(path) => {
                debug!(path = %path.display(), "Loading rule set");
                parse_rules_file(path)?
            }
            None => RuleSet::nyc_rolling_sales(),
        };
        Self::with_rules(config, rules)
    }

    /// Creates a pipeline with an explicit rule set, ignoring `config.rules`.
    pub fn with_rules(config: PipelineConfig, rules: RuleSet) -> Result<Self> {
        config.validate()?;
        rules.validate_definition()?;
        let orchestrator = ValidityOrchestrator::new(rules).with_verbose(config.verbose);
        Ok(Self {
            config,
            orchestrator,
        })
    }

    /// The run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The rule set applied by the validity pass.
    pub fn rules(&self) -> &RuleSet {
        self.orchestrator.rules()
    }

    /// Runs the pipeline once and returns the re-loaded cleaned dataset.
    pub fn clean(&self) -> Result<(DataSet, CleaningReport)> {
        let start = Instant::now();
        let source = &self.config.source;
        let destination = &self.config.destination;

        info!(source = %source.display(), "Cleaning dataset");
        let raw = load_csv(source)?;

        let (mut dataset, validation) = self.orchestrator.run(raw)?;

        let duplicates_removed = dataset.drop_duplicates();
        debug!(duplicates_removed, "Removed duplicate rows");

        let dropped_columns: Vec<String> = self
            .rules()
            .drop_columns
            .iter()
            .filter(|column| dataset.drop_column(column))
            .cloned()
            .collect();

        write_csv(&dataset, destination)?;
        let cleaned = load_csv(destination)?;

        let report = CleaningReport {
            source: source.clone(),
            destination: destination.clone(),
            validation,
            duplicates_removed,
            dropped_columns,
            rows_written: cleaned.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            finished_at: Utc::now(),
        };

        info!(
            destination = %destination.display(),
            rows_in = report.rows_loaded(),
            rows_out = report.rows_written,
            duration_ms = report.duration_ms,
            "Cleaned dataset written"
        );

        Ok((cleaned, report))
    }

    /// Runs the pipeline under the configured retry policy.
    pub async fn clean_with_retry(&self) -> Result<(DataSet, CleaningReport)> {
        let policy = RetryPolicy::from(&self.config.retry);
        policy.run(|| async { self.clean() }).await
    }
}

/// Cleans `source` with the built-in rules, writing to the default destination.
///
/// Returns the re-loaded cleaned dataset.
pub fn clean(source: impl AsRef<Path>) -> Result<DataSet> {
    let config = PipelineConfig::builder().source(source).build()?;
    let (dataset, _) = CleaningPipeline::new(config)?.clean()?;
    Ok(dataset)
}
