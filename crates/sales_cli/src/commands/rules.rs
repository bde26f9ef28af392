use anyhow::{Context, Result};
use sales_core::RuleSet;
use sales_parser::parse_rules_file;
use std::path::Path;

use crate::output;

pub async fn execute(rules_path: Option<&str>, format: &str) -> Result<()> {
    let rules = match rules_path {
        Some(path) => parse_rules_file(Path::new(path))
            .with_context(|| format!("Failed to parse rule set: {}", path))?,
        None => RuleSet::nyc_rolling_sales(),
    };

    output::print_rules(&rules, format)
}
