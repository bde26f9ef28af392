//! Pipeline and serving configuration.
//!
//! Both configs are plain values handed to the pipeline entry point and the
//! prediction service at startup. Nothing here is process-global.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the cleaned dataset.
pub const DEFAULT_DESTINATION: &str = "data/cleaned_data.csv";

/// Retry settings for a pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Fixed delay between attempts, in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_retries() -> u32 {
    3
}

fn default_delay_secs() -> u64 {
    60
}

impl RetryConfig {
    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            delay_secs: default_delay_secs(),
        }
    }
}

/// Configuration for one cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw CSV to clean
    pub source: PathBuf,

    /// Where the cleaned CSV is written
    #[serde(default = "default_destination")]
    pub destination: PathBuf,

    /// Emit one diagnostic line per rule violation
    #[serde(default)]
    pub verbose: bool,

    /// Optional rule set file; the built-in NYC rules are used when absent
    #[serde(default)]
    pub rules: Option<PathBuf>,

    /// Retry policy for the cleaning step
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_destination() -> PathBuf {
    PathBuf::from(DEFAULT_DESTINATION)
}

impl PipelineConfig {
    /// Creates a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source.as_os_str().is_empty() {
            return Err(CoreError::configuration("source cannot be empty"));
        }

        if self.destination.as_os_str().is_empty() {
            return Err(CoreError::configuration("destination cannot be empty"));
        }

        if self.source == self.destination {
            return Err(CoreError::configuration(
                "destination must differ from source",
            ));
        }

        Ok(())
    }
}

/// Builder for `PipelineConfig`.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
    verbose: bool,
    rules: Option<PathBuf>,
    retry: RetryConfig,
}

impl PipelineConfigBuilder {
    /// Sets the source CSV.
    pub fn source(mut self, path: impl AsRef<Path>) -> Self {
        self.source = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the destination CSV.
    pub fn destination(mut self, path: impl AsRef<Path>) -> Self {
        self.destination = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables verbose diagnostics.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets a rule set file.
    pub fn rules(mut self, path: impl AsRef<Path>) -> Self {
        self.rules = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the retry count and the delay between attempts, in seconds.
    pub fn retry(mut self, retries: u32, delay_secs: u64) -> Self {
        self.retry = RetryConfig {
            retries,
            delay_secs,
        };
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<PipelineConfig, CoreError> {
        let source = self
            .source
            .ok_or_else(|| CoreError::configuration("source is required"))?;

        let config = PipelineConfig {
            source,
            destination: self.destination.unwrap_or_else(default_destination),
            verbose: self.verbose,
            rules: self.rules,
            retry: self.retry,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration for the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingConfig {
    /// Model registry / tracking server URI
    #[serde(default = "default_tracking_uri")]
    pub tracking_uri: String,

    /// Experiment runs are logged under
    #[serde(default = "default_model_name")]
    pub experiment: String,

    /// Registered model name
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Registry stage predictions are served from
    #[serde(default = "default_stage")]
    pub stage: String,
}

fn default_tracking_uri() -> String {
    "http://localhost:5000".to_string()
}

fn default_model_name() -> String {
    "NYC Rolling Sales".to_string()
}

fn default_stage() -> String {
    "Production".to_string()
}

impl ServingConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.tracking_uri.is_empty() {
            return Err(CoreError::configuration("tracking_uri cannot be empty"));
        }
        if self.model_name.is_empty() {
            return Err(CoreError::configuration("model_name cannot be empty"));
        }
        if self.stage.is_empty() {
            return Err(CoreError::configuration("stage cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            tracking_uri: default_tracking_uri(),
            experiment: default_model_name(),
            model_name: default_model_name(),
            stage: default_stage(),
        }
    }
}
