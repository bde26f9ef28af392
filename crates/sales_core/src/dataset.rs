//! Tabular dataset representation.
//!
//! A [`DataSet`] is an ordered header, an ordered list of rows and one label
//! per row (the index column of the source file). Rows are only ever removed
//! or have their values coerced; nothing in the pipeline adds rows.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

static NULL_VALUE: DataValue = DataValue::Null;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text
    String,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit floating point
    Float,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Float => write!(f, "float"),
        }
    }
}

/// A value in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
}

impl DataValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
        }
    }

    /// Returns the column type this value carries, `None` for null.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            DataValue::Null => None,
            DataValue::String(_) => Some(ColumnType::String),
            DataValue::Int(_) => Some(ColumnType::Integer),
            DataValue::Float(_) => Some(ColumnType::Float),
        }
    }

    /// Returns true if the value is non-null and of the given type.
    pub fn is_of_type(&self, column_type: ColumnType) -> bool {
        self.column_type() == Some(column_type)
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Renders the value the way it is written to a CSV cell.
    ///
    /// Floats always carry a decimal point so that a column of whole-number
    /// floats reads back as floats.
    pub fn render(&self) -> String {
        match self {
            DataValue::Null => String::new(),
            DataValue::String(s) => s.clone(),
            DataValue::Int(i) => i.to_string(),
            DataValue::Float(f) => render_float(*f),
        }
    }
}

fn render_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{text}.0")
    } else {
        text
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            other => write!(f, "{}", other.render()),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DataValue::Null)
    }
}

/// A single row of data, keyed by column name.
pub type DataRow = HashMap<String, DataValue>;

/// An ordered, labelled collection of rows sharing one header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    columns: Vec<String>,
    index_name: String,
    labels: Vec<String>,
    rows: Vec<DataRow>,
}

impl DataSet {
    /// Creates a new empty dataset with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an empty dataset with the given header.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates a dataset from rows, labelling them `0..n`.
    pub fn from_rows<I, S>(columns: I, rows: Vec<DataRow>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::with_columns(columns);
        for row in rows {
            dataset.add_row(row);
        }
        dataset
    }

    /// Sets the header name of the index column.
    pub fn set_index_name(&mut self, name: impl Into<String>) {
        self.index_name = name.into();
    }

    /// Header name of the index column (blank for a default index).
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Returns the ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the header contains `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns the number of rows in the dataset.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter()
    }

    /// Returns a mutable iterator over the rows.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut DataRow> {
        self.rows.iter_mut()
    }

    /// Returns the row labels in row order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Gets a specific row by position.
    pub fn get_row(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    /// Gets a single cell. Absent keys read as null.
    pub fn value(&self, index: usize, column: &str) -> Option<&DataValue> {
        self.rows
            .get(index)
            .map(|row| row.get(column).unwrap_or(&NULL_VALUE))
    }

    /// Returns the values of one column in row order. Absent keys read as null.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a DataValue> {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&NULL_VALUE))
    }

    /// Appends a row labelled with its position.
    pub fn add_row(&mut self, row: DataRow) {
        let label = self.rows.len().to_string();
        self.push_row(label, row);
    }

    /// Appends a row with an explicit label.
    pub fn push_row(&mut self, label: impl Into<String>, row: DataRow) {
        self.labels.push(label.into());
        self.rows.push(row);
    }

    /// Keeps only the rows for which `keep` returns true.
    ///
    /// Returns the number of rows removed.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&DataRow) -> bool,
    {
        let before = self.rows.len();
        let (labels, rows): (Vec<_>, Vec<_>) = std::mem::take(&mut self.labels)
            .into_iter()
            .zip(std::mem::take(&mut self.rows))
            .filter(|(_, row)| keep(row))
            .unzip();
        self.labels = labels;
        self.rows = rows;
        before - self.rows.len()
    }

    /// Removes the rows at the given positions. Unknown positions are ignored.
    ///
    /// Returns the number of rows removed.
    pub fn remove_rows(&mut self, positions: &[usize]) -> usize {
        if positions.is_empty() {
            return 0;
        }
        let drop: HashSet<usize> = positions.iter().copied().collect();
        let mut position = 0;
        self.retain_rows(|_| {
            let keep = !drop.contains(&position);
            position += 1;
            keep
        })
    }

    /// Replaces every value of `column` with `f(value)`.
    pub fn map_column<F>(&mut self, column: &str, mut f: F)
    where
        F: FnMut(&DataValue) -> DataValue,
    {
        for row in &mut self.rows {
            let current = row.get(column).unwrap_or(&NULL_VALUE);
            let next = f(current);
            row.insert(column.to_string(), next);
        }
    }

    /// Removes a column from the header and from every row.
    ///
    /// Returns false if the column was not present.
    pub fn drop_column(&mut self, column: &str) -> bool {
        let Some(position) = self.columns.iter().position(|c| c == column) else {
            return false;
        };
        self.columns.remove(position);
        for row in &mut self.rows {
            row.remove(column);
        }
        true
    }

    /// Removes rows that are equal, across every column, to an earlier row.
    ///
    /// Row labels take no part in the comparison; the first occurrence wins.
    /// Returns the number of rows removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let columns = self.columns.clone();
        let mut seen = HashSet::new();
        self.retain_rows(|row| seen.insert(row_key(&columns, row)))
    }
}

/// Builds a comparison key from every column of a row.
///
/// The type name is part of each cell so `Int(1)` and `String("1")` differ.
fn row_key(columns: &[String], row: &DataRow) -> String {
    columns
        .iter()
        .map(|column| {
            let value = row.get(column).unwrap_or(&NULL_VALUE);
            format!("{}:{}", value.type_name(), value.render())
        })
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

impl IntoIterator for DataSet {
    type Item = DataRow;
    type IntoIter = std::vec::IntoIter<DataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
