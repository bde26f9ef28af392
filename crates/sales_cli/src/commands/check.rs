use anyhow::{Context, Result};
use sales_core::RuleSet;
use sales_parser::{parse_config_file, parse_rules_file};
use std::path::Path;
use tracing::info;

use crate::output;

pub async fn execute(config_path: &str, format: &str) -> Result<()> {
    info!("Checking pipeline configuration: {}", config_path);

    let config = parse_config_file(Path::new(config_path))
        .with_context(|| format!("Failed to parse config file: {}", config_path))?;

    let rules = match &config.rules {
        Some(path) => parse_rules_file(path)
            .with_context(|| format!("Failed to parse rule set: {}", path.display()))?,
        None => RuleSet::nyc_rolling_sales(),
    };

    output::print_config_summary(&config, &rules, format)
}
