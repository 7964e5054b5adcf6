//! Dataset module
//!
//! The single resident CSV dataset and its typed in-memory form:
//! - [`store`] keeps exactly one uploaded file on disk
//! - [`loader`] parses CSV bytes and infers a column schema
//! - [`Table`] is the typed table every later stage reads from

pub mod loader;
pub mod store;

pub use loader::DataLoader;
pub use store::{DatasetFile, DatasetStore, StoredDataset};

use crate::error::{RecappError, Result};
use serde::{Deserialize, Serialize};

/// Normalize a column name into the key used to match request fields.
pub fn column_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// Typed column values; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Integer(_) => ColumnKind::Integer,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    /// NaN counts as missing, same as an empty CSV field.
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Integer(v) => v[row].is_none(),
            ColumnData::Float(v) => v[row].map_or(true, f64::is_nan),
            ColumnData::Text(v) => v[row].is_none(),
        }
    }

    /// Numeric value of a cell, `None` for text columns and missing cells.
    pub fn as_f64(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Integer(v) => v[row].map(|x| x as f64),
            ColumnData::Float(v) => v[row].filter(|x| !x.is_nan()),
            ColumnData::Text(_) => None,
        }
    }

    /// Text rendering of a cell as used for class labels.
    pub fn as_label(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Integer(v) => v[row].map(|x| x.to_string()),
            ColumnData::Float(v) => v[row].filter(|x| !x.is_nan()).map(|x| x.to_string()),
            ColumnData::Text(v) => v[row].clone(),
        }
    }

    fn take(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Integer(v) => ColumnData::Integer(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Float(v) => ColumnData::Float(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Text(v) => ColumnData::Text(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// A named column with its normalized lookup key
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    name: String,
    key: String,
    data: ColumnData,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        let name = name.into();
        let key = column_key(&name);
        Self { name, key, data }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_feature(&self) -> FeatureColumn {
        FeatureColumn {
            key: self.key.clone(),
            name: self.name.clone(),
        }
    }
}

/// Pairing of a request field key with the column it feeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub key: String,
    #[serde(rename = "value")]
    pub name: String,
}

/// Typed, column-oriented table produced by [`DataLoader`]
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<TableColumn>,
    height: usize,
}

impl Table {
    /// Build a table, checking that all columns have the same length.
    pub fn new(columns: Vec<TableColumn>) -> Result<Self> {
        let height = columns.first().map_or(0, TableColumn::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != height) {
            return Err(RecappError::Parse(format!(
                "column '{}' has {} rows, expected {}",
                bad.name(),
                bad.len(),
                height
            )));
        }
        Ok(Self { columns, height })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn column_by_key(&self, key: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.key() == key)
    }

    /// The label column.
    pub fn last_column(&self) -> Option<&TableColumn> {
        self.columns.last()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Columns a user fills in to request a prediction: everything between
    /// the two leading identifier columns and the trailing label.
    pub fn input_fields(&self) -> Vec<FeatureColumn> {
        if self.columns.len() <= 3 {
            return Vec::new();
        }
        self.columns[2..self.columns.len() - 1]
            .iter()
            .map(TableColumn::as_feature)
            .collect()
    }

    pub fn row_has_missing(&self, row: usize) -> bool {
        self.columns.iter().any(|c| c.data().is_missing(row))
    }

    /// Drop every row that has a missing value in any column.
    pub fn drop_missing(&self) -> Table {
        let rows: Vec<usize> = (0..self.height)
            .filter(|&row| !self.row_has_missing(row))
            .collect();
        self.take_rows(&rows)
    }

    /// Keep rows where `mask` is true.
    pub fn filter(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.height {
            return Err(RecappError::InvalidInput(format!(
                "mask length {} does not match table height {}",
                mask.len(),
                self.height
            )));
        }
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        Ok(self.take_rows(&rows))
    }

    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| TableColumn {
                name: c.name.clone(),
                key: c.key.clone(),
                data: c.data.take(rows),
            })
            .collect();
        Table {
            columns,
            height: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(vec![
            TableColumn::new("No", ColumnData::Integer(vec![Some(1), Some(2), Some(3)])),
            TableColumn::new("Full Name", ColumnData::Text(vec![Some("a".into()), None, Some("c".into())])),
            TableColumn::new("Height", ColumnData::Float(vec![Some(1.5), Some(2.0), Some(f64::NAN)])),
            TableColumn::new("Class", ColumnData::Text(vec![Some("x".into()), Some("y".into()), Some("x".into())])),
        ])
        .unwrap()
    }

    #[test]
    fn test_column_key() {
        assert_eq!(column_key("Body Weight"), "body_weight");
        assert_eq!(column_key("NO"), "no");
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = Table::new(vec![
            TableColumn::new("a", ColumnData::Integer(vec![Some(1)])),
            TableColumn::new("b", ColumnData::Integer(vec![Some(1), Some(2)])),
        ]);
        assert!(matches!(result, Err(RecappError::Parse(_))));
    }

    #[test]
    fn test_drop_missing_treats_nan_as_missing() {
        let table = sample_table();
        let cleaned = table.drop_missing();
        assert_eq!(cleaned.height(), 1);
        assert_eq!(cleaned.columns()[0].data(), &ColumnData::Integer(vec![Some(1)]));
    }

    #[test]
    fn test_input_fields_skip_identifiers_and_label() {
        let table = sample_table();
        let fields = table.input_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, "height");
        assert_eq!(fields[0].name, "Height");
    }

    #[test]
    fn test_labels_render_numbers() {
        let data = ColumnData::Float(vec![Some(1.0), Some(2.5)]);
        assert_eq!(data.as_label(0).as_deref(), Some("1"));
        assert_eq!(data.as_label(1).as_deref(), Some("2.5"));
    }
}
