//! Scenario tests for the built-in NYC rolling-sales rule set.
//!
//! Each test builds a small dataset with the full 18-column schema (plus the
//! pass-through columns of the raw export) and checks which rows survive.

use pretty_assertions::assert_eq;
use sales_core::{ColumnType, DataRow, DataSet, DataValue, RuleSet, BOROUGH, EASE_MENT, SALE_PRICE};
use sales_validator::{ValidationError, ValidityOrchestrator, ViolationKind};

const HEADER: [&str; 21] = [
    "BOROUGH",
    "NEIGHBORHOOD",
    "BUILDING CLASS CATEGORY",
    "TAX CLASS AT PRESENT",
    "BLOCK",
    "LOT",
    "EASE-MENT",
    "BUILDING CLASS AT PRESENT",
    "ADDRESS",
    "APARTMENT NUMBER",
    "ZIP CODE",
    "RESIDENTIAL UNITS",
    "COMMERCIAL UNITS",
    "TOTAL UNITS",
    "LAND SQUARE FEET",
    "GROSS SQUARE FEET",
    "YEAR BUILT",
    "TAX CLASS AT TIME OF SALE",
    "BUILDING CLASS AT TIME OF SALE",
    "SALE PRICE",
    "SALE DATE",
];

/// A fully valid row, as a fresh CSV read would type it.
fn valid_row() -> DataRow {
    let values: [(&str, DataValue); 21] = [
        ("BOROUGH", 1_i64.into()),
        ("NEIGHBORHOOD", "ALPHABET CITY".into()),
        ("BUILDING CLASS CATEGORY", "07 RENTALS - WALKUP APARTMENTS".into()),
        ("TAX CLASS AT PRESENT", "2A".into()),
        ("BLOCK", 392_i64.into()),
        ("LOT", 6_i64.into()),
        ("EASE-MENT", DataValue::Null),
        ("BUILDING CLASS AT PRESENT", "C2".into()),
        ("ADDRESS", "153 AVENUE B".into()),
        ("APARTMENT NUMBER", DataValue::Null),
        ("ZIP CODE", 10009_i64.into()),
        ("RESIDENTIAL UNITS", 5_i64.into()),
        ("COMMERCIAL UNITS", 0_i64.into()),
        ("TOTAL UNITS", 5_i64.into()),
        ("LAND SQUARE FEET", 1633.0.into()),
        ("GROSS SQUARE FEET", 6440.0.into()),
        ("YEAR BUILT", 1900_i64.into()),
        ("TAX CLASS AT TIME OF SALE", 2_i64.into()),
        ("BUILDING CLASS AT TIME OF SALE", "C2".into()),
        ("SALE PRICE", 6_625_000.0.into()),
        ("SALE DATE", "2017-07-19 00:00:00".into()),
    ];
    values
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn with(column: &str, value: DataValue) -> DataRow {
    let mut row = valid_row();
    row.insert(column.to_string(), value);
    row
}

fn dataset(rows: Vec<DataRow>) -> DataSet {
    DataSet::from_rows(HEADER, rows)
}

#[test]
fn test_valid_rows_survive() {
    let input = dataset(vec![valid_row(), with("LOT", 7_i64.into())]);

    let (cleaned, report) = ValidityOrchestrator::nyc_rolling_sales().run(input).unwrap();

    assert_eq!(cleaned.len(), 2);
    assert_eq!(report.columns_checked, 18);
    // TAX CLASS AT TIME OF SALE is read as integers and stringified
    assert_eq!(
        report.violations.iter().map(|v| v.kind).collect::<Vec<_>>(),
        vec![ViolationKind::TypeMismatch]
    );
    assert_eq!(report.rows_dropped(), 0);
}

#[test]
fn test_borough_outside_domain_dropped() {
    let input = dataset(vec![valid_row(), with(BOROUGH, "7".into())]);

    let (cleaned, _) = ValidityOrchestrator::nyc_rolling_sales().run(input).unwrap();

    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned.labels(), &["0"]);
}

#[test]
fn test_unparseable_sale_price_dropped() {
    let mut row = with(SALE_PRICE, "abc".into());
    row.insert(BOROUGH.to_string(), 3_i64.into());
    let input = dataset(vec![valid_row(), row]);

    let (cleaned, report) = ValidityOrchestrator::nyc_rolling_sales().run(input).unwrap();

    assert_eq!(cleaned.len(), 1);
    assert!(report.violations.iter().any(|v| v.column == SALE_PRICE
        && v.kind == ViolationKind::TypeMismatch
        && v.rows_dropped == 1));
}

#[test]
fn test_sale_price_below_minimum_dropped() {
    let input = dataset(vec![
        valid_row(),
        with(SALE_PRICE, 500.0.into()),
        with(SALE_PRICE, 0.0.into()),
        with(SALE_PRICE, 1000.0.into()),
    ]);

    let (cleaned, _) = ValidityOrchestrator::nyc_rolling_sales().run(input).unwrap();

    let prices: Vec<_> = cleaned.column_values(SALE_PRICE).cloned().collect();
    assert_eq!(
        prices,
        vec![DataValue::Float(6_625_000.0), DataValue::Float(1000.0)]
    );
}

#[test]
fn test_null_rows_absent_for_every_checked_column() {
    let rules = RuleSet::nyc_rolling_sales();
    let mut rows = vec![valid_row()];
    for column in rules.column_names() {
        rows.push(with(column, DataValue::Null));
    }

    let (cleaned, report) = ValidityOrchestrator::nyc_rolling_sales()
        .run(dataset(rows))
        .unwrap();

    assert_eq!(cleaned.len(), 1);
    assert_eq!(report.rows_dropped(), 18);
    let nulls = report
        .violations
        .iter()
        .filter(|v| v.kind == ViolationKind::Null)
        .count();
    assert_eq!(nulls, 18);
}

#[test]
fn test_unchecked_columns_pass_through() {
    let input = dataset(vec![valid_row()]);
    let (cleaned, _) = ValidityOrchestrator::nyc_rolling_sales().run(input).unwrap();

    assert_eq!(cleaned.value(0, EASE_MENT), Some(&DataValue::Null));
    assert_eq!(cleaned.value(0, "APARTMENT NUMBER"), Some(&DataValue::Null));
    assert!(cleaned.has_column(EASE_MENT));
}

#[test]
fn test_output_satisfies_column_contracts() {
    let input = dataset(vec![
        valid_row(),
        with(BOROUGH, 2.0.into()),
        with("ZIP CODE", "10011".into()),
        with("LAND SQUARE FEET", " -  ".into()),
        with("GROSS SQUARE FEET", 2500_i64.into()),
        with("YEAR BUILT", "19xx".into()),
        with(SALE_PRICE, 250_000_000.0.into()),
    ]);

    let (cleaned, _) = ValidityOrchestrator::nyc_rolling_sales().run(input).unwrap();
    let rules = RuleSet::nyc_rolling_sales();

    assert_eq!(cleaned.len(), 4);
    for spec in &rules.columns {
        for value in cleaned.column_values(&spec.name) {
            assert!(
                value.is_of_type(spec.column_type),
                "{} holds {:?}, expected {}",
                spec.name,
                value,
                spec.column_type
            );
        }
    }
    for code in cleaned.column_values(BOROUGH) {
        assert!((1..=5).contains(&code.as_int().unwrap()));
    }
    for price in cleaned.column_values(SALE_PRICE) {
        let price = price.as_float().unwrap();
        assert!((1000.0..=100_000_000.0).contains(&price));
    }
}

#[test]
fn test_second_pass_is_noop() {
    let input = dataset(vec![
        valid_row(),
        with("BLOCK", "12".into()),
        with(BOROUGH, 9_i64.into()),
        with("NEIGHBORHOOD", DataValue::Null),
    ]);

    let orchestrator = ValidityOrchestrator::nyc_rolling_sales();
    let (once, _) = orchestrator.run(input).unwrap();
    let (twice, report) = orchestrator.run(once.clone()).unwrap();

    assert_eq!(twice, once);
    assert!(report.is_clean());
}

#[test]
fn test_missing_schema_column_is_fatal() {
    let mut input = dataset(vec![valid_row()]);
    input.drop_column("YEAR BUILT");

    let err = ValidityOrchestrator::nyc_rolling_sales()
        .run(input)
        .unwrap_err();

    assert!(matches!(err, ValidationError::SchemaError(_)));
    assert!(err.to_string().contains("YEAR BUILT"));
}

#[test]
fn test_type_declarations_match_export() {
    let rules = RuleSet::nyc_rolling_sales();
    let floats: Vec<_> = rules
        .columns
        .iter()
        .filter(|c| c.column_type == ColumnType::Float)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(floats, vec!["LAND SQUARE FEET", "GROSS SQUARE FEET", "SALE PRICE"]);
}
