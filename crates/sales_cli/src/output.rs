use anyhow::Result;
use colored::*;
use sales_core::{ColumnConstraint, ColumnSpec, PipelineConfig, RuleSet};
use sales_pipeline::CleaningReport;
use serde_json::json;

pub fn print_cleaning_report(report: &CleaningReport, format: &str) -> Result<()> {
    match format {
        "json" => print_json_report(report),
        _ => {
            print_text_report(report);
            Ok(())
        }
    }
}

fn print_text_report(report: &CleaningReport) {
    let validation = &report.validation;

    println!("\n{}", "═".repeat(60));
    println!("{}", "  CLEANING REPORT".bold());
    println!("{}", "═".repeat(60));

    println!(
        "\n{} {}",
        "✓".green().bold(),
        format!("Cleaned dataset written to {}", report.destination.display())
            .green()
            .bold()
    );

    println!("\n{}", "Rows:".bold());
    println!("  Loaded:      {}", report.rows_loaded());
    println!("  Invalid:     {}", validation.rows_dropped());
    println!("  Duplicates:  {}", report.duplicates_removed);
    println!("  Written:     {}", report.rows_written);

    let dropped = validation.dropped_by_column();
    if !dropped.is_empty() {
        println!("\n{}", "Dropped by column:".yellow().bold());
        for (column, rows) in &dropped {
            println!("  {:<32} {}", column, rows);
        }
    }

    if !validation.violations.is_empty() {
        println!("\n{}", "Violations:".yellow().bold());
        for (i, violation) in validation.violations.iter().enumerate() {
            println!(
                "  {}. [{}] {}",
                i + 1,
                violation.kind,
                violation.to_string().yellow()
            );
        }
    }

    if !report.dropped_columns.is_empty() {
        println!("\nColumns removed: {}", report.dropped_columns.join(", "));
    }

    println!("\n{}", "Summary:".bold());
    println!("  Source:      {}", report.source.display());
    println!("  Duration:    {} ms", report.duration_ms);
    println!("  Finished at: {}", report.finished_at.to_rfc3339());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &CleaningReport) -> Result<()> {
    let validation = &report.validation;
    let dropped_by_column: serde_json::Map<String, serde_json::Value> = validation
        .dropped_by_column()
        .into_iter()
        .map(|(column, rows)| (column, json!(rows)))
        .collect();

    let output = json!({
        "source": report.source.display().to_string(),
        "destination": report.destination.display().to_string(),
        "rows": {
            "loaded": report.rows_loaded(),
            "invalid": validation.rows_dropped(),
            "duplicates": report.duplicates_removed,
            "written": report.rows_written,
        },
        "dropped_by_column": dropped_by_column,
        "violations": validation.violations.iter().map(|v| json!({
            "column": v.column,
            "category": v.kind.as_str(),
            "rows_flagged": v.rows_flagged,
            "rows_dropped": v.rows_dropped,
            "message": v.message,
        })).collect::<Vec<_>>(),
        "dropped_columns": report.dropped_columns,
        "duration_ms": report.duration_ms,
        "finished_at": report.finished_at.to_rfc3339(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_config_summary(config: &PipelineConfig, rules: &RuleSet, format: &str) -> Result<()> {
    if format == "json" {
        let output = json!({
            "valid": true,
            "source": config.source.display().to_string(),
            "source_exists": config.source.exists(),
            "destination": config.destination.display().to_string(),
            "verbose": config.verbose,
            "retry": {
                "retries": config.retry.retries,
                "delay_secs": config.retry.delay_secs,
            },
            "rules": {
                "name": rules.name,
                "columns": rules.columns.len(),
                "drop_columns": rules.drop_columns,
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_success("Pipeline configuration is valid");

    println!("\nConfiguration Summary:");
    println!("  Source:      {}", config.source.display());
    if !config.source.exists() {
        println!("               {}", "(not found yet)".yellow());
    }
    println!("  Destination: {}", config.destination.display());
    println!("  Verbose:     {}", config.verbose);
    println!(
        "  Retry:       {} retries, {} s apart",
        config.retry.retries, config.retry.delay_secs
    );
    println!(
        "  Rules:       {} ({} columns)",
        config
            .rules
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        rules.columns.len()
    );
    if !rules.drop_columns.is_empty() {
        println!("  Drops:       {}", rules.drop_columns.join(", "));
    }

    Ok(())
}

pub fn print_rules(rules: &RuleSet, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(rules)?);
        return Ok(());
    }

    print_info(&format!(
        "Rule set: {} ({} columns)",
        rules.name,
        rules.columns.len()
    ));
    println!();
    for (i, column) in rules.columns.iter().enumerate() {
        println!(
            "  {:>2}. {:<32} {:<8} {}",
            i + 1,
            column.name,
            column.column_type.to_string(),
            describe_constraint(column).dimmed()
        );
    }
    if !rules.drop_columns.is_empty() {
        println!("\n  Dropped after validation: {}", rules.drop_columns.join(", "));
    }

    Ok(())
}

fn describe_constraint(column: &ColumnSpec) -> String {
    match &column.constraint {
        Some(ColumnConstraint::AllowedValues { values }) => {
            let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            format!("one of {{{}}}", values.join(", "))
        }
        Some(ColumnConstraint::Range { min, max }) => format!("between {} and {}", min, max),
        None => String::new(),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
