//! CSV loading and schema inference

use super::{ColumnData, Table, TableColumn};
use crate::error::{RecappError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// CSV loader producing a typed [`Table`]
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows sampled for dtype inference
    infer_schema_length: Option<usize>,
    /// Field separator
    separator: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(1000),
            separator: b',',
        }
    }

    /// Set the number of rows used for schema inference (`None` scans all)
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Parse CSV bytes into a typed table
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let start = Instant::now();
        let df = self.options().into_reader_with_file_handle(Cursor::new(bytes)).finish()?;
        let table = frame_to_table(&df)?;
        debug!(
            rows = table.height(),
            columns = table.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Parsed CSV dataset"
        );
        Ok(table)
    }

    /// Read and parse a CSV file
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Table> {
        let file = File::open(path.as_ref())?;
        let df = self.options().into_reader_with_file_handle(file).finish()?;
        frame_to_table(&df)
    }

    fn options(&self) -> CsvReadOptions {
        let parse_opts = CsvParseOptions::default().with_separator(self.separator);
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
    }
}

/// Map polars dtypes onto the three column kinds the pipeline knows about.
fn frame_to_table(df: &DataFrame) -> Result<Table> {
    if df.width() == 0 {
        return Err(RecappError::Parse("CSV file has no columns".to_string()));
    }

    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let dtype = series.dtype();
        let data = if dtype.is_integer() {
            let cast = series.cast(&DataType::Int64)?;
            ColumnData::Integer(cast.i64()?.into_iter().collect())
        } else if dtype.is_float() {
            let cast = series.cast(&DataType::Float64)?;
            ColumnData::Float(cast.f64()?.into_iter().collect())
        } else {
            let cast = series.cast(&DataType::String)?;
            ColumnData::Text(
                cast.str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            )
        };
        columns.push(TableColumn::new(series.name().to_string(), data));
    }

    Table::new(columns)
}
