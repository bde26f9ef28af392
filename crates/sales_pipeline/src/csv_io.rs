//! CSV persistence.
//!
//! Files carry a header row whose first cell names the index column, and each
//! record starts with its row label. Cells that are blank after trimming load
//! as null. Column types are inferred on load: integer when every non-null
//! cell parses as `i64`, float when every one parses as `f64`, text otherwise.

use crate::{PipelineError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use sales_core::{ColumnType, DataRow, DataSet, DataValue};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads a labelled CSV file into a [`DataSet`].
///
/// # Errors
///
/// `NotFound` if `path` does not exist, `Csv` if the reader fails and
/// `Malformed` if the header is missing or repeats a column.
pub fn load_csv(path: &Path) -> Result<DataSet> {
    if !path.exists() {
        return Err(PipelineError::NotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::csv(path, e))?
        .clone();
    if headers.len() < 2 {
        return Err(PipelineError::malformed(
            path,
            "expected an index column followed by at least one data column",
        ));
    }

    let index_name = headers[0].trim().to_string();
    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut seen = HashSet::new();
    if let Some(duplicate) = columns.iter().find(|c| !seen.insert(c.as_str())) {
        return Err(PipelineError::malformed(
            path,
            format!("column '{duplicate}' appears more than once"),
        ));
    }

    let mut labels = Vec::new();
    let mut cells: Vec<Vec<Option<String>>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PipelineError::csv(path, e))?;
        let label = record.get(0).unwrap_or_default().trim();
        labels.push(if label.is_empty() {
            labels.len().to_string()
        } else {
            label.to_string()
        });
        cells.push(
            record
                .iter()
                .skip(1)
                .map(|cell| (!cell.trim().is_empty()).then(|| cell.to_string()))
                .collect(),
        );
    }

    let types: Vec<ColumnType> = (0..columns.len())
        .map(|i| infer_type(cells.iter().filter_map(|row| row[i].as_deref())))
        .collect();

    let mut dataset = DataSet::with_columns(columns.clone());
    dataset.set_index_name(index_name);
    for (label, row) in labels.into_iter().zip(cells) {
        let row: DataRow = columns
            .iter()
            .zip(&types)
            .zip(row)
            .map(|((column, kind), cell)| (column.clone(), parse_cell(cell, *kind)))
            .collect();
        dataset.push_row(label, row);
    }

    debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "Loaded CSV"
    );
    Ok(dataset)
}

/// Writes `dataset` as a labelled CSV file, creating parent directories.
pub fn write_csv(dataset: &DataSet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;

    let header = std::iter::once(dataset.index_name()).chain(dataset.columns().iter().map(String::as_str));
    writer
        .write_record(header)
        .map_err(|e| PipelineError::csv(path, e))?;

    for (position, label) in dataset.labels().iter().enumerate() {
        let mut record = Vec::with_capacity(dataset.columns().len() + 1);
        record.push(label.clone());
        for column in dataset.columns() {
            let value = dataset.value(position, column).unwrap_or(&DataValue::Null);
            record.push(value.render());
        }
        writer
            .write_record(&record)
            .map_err(|e| PipelineError::csv(path, e))?;
    }

    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    debug!(path = %path.display(), rows = dataset.len(), "Wrote CSV");
    Ok(())
}

/// Narrowest type every cell parses as.
fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut kind = ColumnType::Integer;
    for cell in cells {
        let cell = cell.trim();
        if kind == ColumnType::Integer && cell.parse::<i64>().is_err() {
            kind = ColumnType::Float;
        }
        if kind == ColumnType::Float && !cell.parse::<f64>().is_ok_and(f64::is_finite) {
            return ColumnType::String;
        }
    }
    kind
}

fn parse_cell(cell: Option<String>, kind: ColumnType) -> DataValue {
    let Some(cell) = cell else {
        return DataValue::Null;
    };
    match kind {
        ColumnType::Integer => cell
            .trim()
            .parse::<i64>()
            .map_or(DataValue::String(cell.clone()), DataValue::Int),
        ColumnType::Float => cell
            .trim()
            .parse::<f64>()
            .map_or(DataValue::String(cell.clone()), DataValue::Float),
        ColumnType::String => DataValue::String(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_infer_type() {
        assert_eq!(infer_type(["1", " 2 ", "-3"].into_iter()), ColumnType::Integer);
        assert_eq!(infer_type(["1", "2.5"].into_iter()), ColumnType::Float);
        assert_eq!(infer_type(["1", " -  "].into_iter()), ColumnType::String);
        assert_eq!(infer_type(["2A", "1"].into_iter()), ColumnType::String);
        assert_eq!(infer_type(["inf"].into_iter()), ColumnType::String);
    }

    #[test]
    fn test_load_infers_and_nulls() {
        let file = write_temp(",CODE,AREA,NAME,NOTE\n7,1,10,a,\n9,2,12.5, ,x\n");

        let dataset = load_csv(file.path()).unwrap();

        assert_eq!(dataset.index_name(), "");
        assert_eq!(dataset.columns(), &["CODE", "AREA", "NAME", "NOTE"]);
        assert_eq!(dataset.labels(), &["7", "9"]);
        assert_eq!(dataset.value(0, "CODE"), Some(&DataValue::Int(1)));
        assert_eq!(dataset.value(0, "AREA"), Some(&DataValue::Float(10.0)));
        assert_eq!(dataset.value(1, "NAME"), Some(&DataValue::Null));
        assert_eq!(dataset.value(0, "NOTE"), Some(&DataValue::Null));
        assert_eq!(dataset.value(1, "NOTE"), Some(&DataValue::String("x".into())));
    }

    #[test]
    fn test_text_preserved_verbatim() {
        let file = write_temp(",PRICE\n0,100\n1, -  \n");
        let dataset = load_csv(file.path()).unwrap();
        assert_eq!(dataset.value(0, "PRICE"), Some(&DataValue::String("100".into())));
        assert_eq!(dataset.value(1, "PRICE"), Some(&DataValue::String(" -  ".into())));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_csv(Path::new("no/such/raw.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let file = write_temp(",A,A\n0,1,2\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Malformed { .. }));
    }

    #[test]
    fn test_ragged_record_rejected() {
        let file = write_temp(",A,B\n0,1\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Csv { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_write_then_load_keeps_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");

        let mut dataset = DataSet::with_columns(["ID", "AREA", "CLASS", "EMPTY"]);
        dataset.push_row(
            "3",
            DataRow::from([
                ("ID".to_string(), DataValue::Int(1)),
                ("AREA".to_string(), DataValue::Float(1633.0)),
                ("CLASS".to_string(), DataValue::String("C2".into())),
                ("EMPTY".to_string(), DataValue::Null),
            ]),
        );
        dataset.push_row(
            "8",
            DataRow::from([
                ("ID".to_string(), DataValue::Int(2)),
                ("AREA".to_string(), DataValue::Float(2.5)),
                ("CLASS".to_string(), DataValue::String("with, comma".into())),
                ("EMPTY".to_string(), DataValue::Null),
            ]),
        );

        write_csv(&dataset, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(",ID,AREA,CLASS,EMPTY\n3,1,1633.0,C2,\n"));

        let reloaded = load_csv(&path).unwrap();
        assert_eq!(reloaded, dataset);
    }
}
