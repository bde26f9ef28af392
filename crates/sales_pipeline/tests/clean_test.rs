//! End-to-end cleaning runs over a small NYC rolling-sales sample.

use pretty_assertions::assert_eq;
use sales_core::{DataValue, PipelineConfig, RuleSet, BOROUGH, EASE_MENT, SALE_PRICE};
use sales_pipeline::{load_csv, CleaningPipeline, PipelineError};
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn pipeline(source: &Path, destination: &Path) -> CleaningPipeline {
    let config = PipelineConfig::builder()
        .source(source)
        .destination(destination)
        .retry(0, 0)
        .build()
        .unwrap();
    CleaningPipeline::new(config).unwrap()
}

#[test]
fn test_clean_nyc_sample() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("data/cleaned_data.csv");

    let (cleaned, report) = pipeline(&fixture_path("nyc_sample.csv"), &destination)
        .clean()
        .unwrap();

    assert_eq!(cleaned.labels(), &["4", "10", "12"]);
    assert_eq!(report.rows_loaded(), 9);
    assert_eq!(report.validation.rows_dropped(), 5);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.dropped_columns, vec![EASE_MENT]);
    assert_eq!(report.rows_written, 3);
    assert!(destination.exists());

    let dropped = report.validation.dropped_by_column();
    assert_eq!(
        dropped,
        vec![
            (BOROUGH.to_string(), 1),
            ("NEIGHBORHOOD".to_string(), 1),
            ("YEAR BUILT".to_string(), 1),
            (SALE_PRICE.to_string(), 2),
        ]
    );
}

#[test]
fn test_cleaned_dataset_invariants() {
    let dir = tempfile::tempdir().unwrap();
    let (cleaned, _) = pipeline(&fixture_path("nyc_sample.csv"), &dir.path().join("out.csv"))
        .clean()
        .unwrap();
    let rules = RuleSet::nyc_rolling_sales();

    assert!(!cleaned.has_column(EASE_MENT));
    for column in rules.column_names() {
        assert!(
            cleaned.column_values(column).all(|v| !v.is_null()),
            "{column} holds nulls"
        );
    }
    for code in cleaned.column_values(BOROUGH) {
        assert!(matches!(code, DataValue::Int(1..=5)));
    }
    for price in cleaned.column_values(SALE_PRICE) {
        let price = price.as_float().unwrap();
        assert!((1_000.0..=100_000_000.0).contains(&price));
    }
    assert_eq!(
        cleaned.value(2, SALE_PRICE),
        Some(&DataValue::Float(1000.0))
    );
    assert_eq!(
        cleaned.value(0, "LAND SQUARE FEET"),
        Some(&DataValue::Float(1633.0))
    );
}

#[test]
fn test_clean_is_fixed_point() {
    let dir = tempfile::tempdir().unwrap();
    let first_out = dir.path().join("first.csv");
    let second_out = dir.path().join("second.csv");

    let (first, _) = pipeline(&fixture_path("nyc_sample.csv"), &first_out)
        .clean()
        .unwrap();
    let (second, report) = pipeline(&first_out, &second_out).clean().unwrap();

    assert_eq!(second, first);
    assert_eq!(report.validation.rows_dropped(), 0);
    assert_eq!(report.duplicates_removed, 0);
    assert!(report.dropped_columns.is_empty());
    assert_eq!(
        std::fs::read_to_string(&first_out).unwrap(),
        std::fs::read_to_string(&second_out).unwrap()
    );
}

#[test]
fn test_rerun_on_same_source_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("cleaned.csv");
    let pipeline = pipeline(&fixture_path("nyc_sample.csv"), &destination);

    let (first, _) = pipeline.clean().unwrap();
    let (second, _) = pipeline.clean().unwrap();

    assert_eq!(first, second);
    assert_eq!(load_csv(&destination).unwrap(), second);
}

#[test]
fn test_missing_source_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = pipeline(&dir.path().join("missing.csv"), &dir.path().join("out.csv"))
        .clean()
        .unwrap_err();

    assert!(matches!(err, PipelineError::NotFound(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_destination_defaults_to_cleaned_data() {
    let config = PipelineConfig::builder()
        .source(fixture_path("nyc_sample.csv"))
        .build()
        .unwrap();
    assert_eq!(config.destination, Path::new(sales_core::DEFAULT_DESTINATION));
}

#[test]
fn test_clean_entry_point_reports_missing_source() {
    let err = sales_pipeline::clean("does/not/exist/nyc-rolling-sales.csv").unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
}
