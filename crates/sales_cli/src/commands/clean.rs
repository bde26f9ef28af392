use anyhow::{bail, Context, Result};
use sales_core::PipelineConfig;
use sales_parser::parse_config_file;
use sales_pipeline::CleaningPipeline;
use std::path::Path;
use tracing::info;

use crate::output;

/// Command-line settings for one cleaning run. Set fields override the config file.
pub struct CleanOptions {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub config: Option<String>,
    pub rules: Option<String>,
    pub retries: Option<u32>,
    pub retry_delay: Option<u64>,
    pub verbose: bool,
}

pub async fn execute(options: CleanOptions, format: &str) -> Result<()> {
    let config = resolve_config(options)?;
    info!("Cleaning {}", config.source.display());

    let pipeline = CleaningPipeline::new(config).context("Failed to set up the cleaning pipeline")?;
    if format != "json" {
        output::print_info(&format!(
            "Rule set loaded: {} ({} columns)",
            pipeline.rules().name,
            pipeline.rules().columns.len()
        ));
    }

    let (_, report) = pipeline
        .clean_with_retry()
        .await
        .with_context(|| format!("Failed to clean {}", pipeline.config().source.display()))?;

    output::print_cleaning_report(&report, format)
}

fn resolve_config(options: CleanOptions) -> Result<PipelineConfig> {
    let mut config = match &options.config {
        Some(path) => parse_config_file(Path::new(path))
            .with_context(|| format!("Failed to parse config file: {}", path))?,
        None => {
            let Some(source) = &options.source else {
                bail!("No source given: pass a CSV path, set SALES_SOURCE or use --config");
            };
            let mut builder = PipelineConfig::builder().source(source);
            if let Some(destination) = &options.destination {
                builder = builder.destination(destination);
            }
            builder.build().context("Invalid pipeline configuration")?
        }
    };

    if let Some(source) = options.source {
        config.source = source.into();
    }
    if let Some(destination) = options.destination {
        config.destination = destination.into();
    }
    if let Some(rules) = options.rules {
        config.rules = Some(rules.into());
    }
    if let Some(retries) = options.retries {
        config.retry.retries = retries;
    }
    if let Some(delay) = options.retry_delay {
        config.retry.delay_secs = delay;
    }
    config.verbose |= options.verbose;

    config.validate().context("Invalid pipeline configuration")?;
    Ok(config)
}
