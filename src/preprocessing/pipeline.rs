//! Dataset cleaning pipeline

use super::{MinMaxScaler, OutlierDetector, PreprocessingConfig};
use crate::dataset::{FeatureColumn, Table, TableColumn};
use crate::error::{RecappError, Result};
use ndarray::Array2;
use tracing::{debug, info};

/// Output of [`Preprocessor::clean`]: scaled features, aligned labels and the
/// state needed to scale an inference row the same way.
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Min-max scaled feature matrix, one row per surviving table row
    pub features: Array2<f64>,
    /// Label of each feature row
    pub labels: Vec<String>,
    /// Feature columns in matrix column order
    pub feature_columns: Vec<FeatureColumn>,
    /// Scaler fitted on the unscaled feature matrix
    pub scaler: MinMaxScaler,
    /// Rows in the table before cleaning
    pub source_rows: usize,
}

impl PreparedData {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Turns a loaded table into a training-ready matrix
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessingConfig,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Drop incomplete rows, remove IQR outliers, select numeric features
    /// (minus the identifier column) and min-max scale them.
    pub fn clean(&self, table: &Table) -> Result<PreparedData> {
        self.config.validate()?;

        let complete = table.drop_missing();
        let filtered = OutlierDetector::iqr(self.config.iqr_factor).fit_transform(&complete)?;
        debug!(
            rows = table.height(),
            complete_rows = complete.height(),
            kept_rows = filtered.height(),
            "Removed incomplete rows and outliers"
        );

        if filtered.height() == 0 {
            return Err(RecappError::EmptyDataset(
                "no rows left after removing missing values and outliers".to_string(),
            ));
        }

        let id_key = self.config.id_key();
        let feature_cols: Vec<&TableColumn> = filtered
            .numeric_columns()
            .filter(|c| c.key() != id_key)
            .collect();
        if feature_cols.is_empty() {
            return Err(RecappError::EmptyDataset("dataset has no numeric feature columns".to_string()));
        }

        let labels = extract_labels(&filtered)?;
        let raw = columns_to_array2(&feature_cols, filtered.height())?;
        let scaler = MinMaxScaler::fit(&raw)?;
        let features = scaler.transform(&raw)?;

        let feature_columns: Vec<FeatureColumn> = feature_cols.iter().map(|c| c.as_feature()).collect();
        info!(
            rows = features.nrows(),
            features = features.ncols(),
            dropped = table.height() - features.nrows(),
            "Dataset cleaned"
        );

        Ok(PreparedData {
            features,
            labels,
            feature_columns,
            scaler,
            source_rows: table.height(),
        })
    }
}

fn extract_labels(table: &Table) -> Result<Vec<String>> {
    let label_col = table
        .last_column()
        .ok_or_else(|| RecappError::EmptyDataset("dataset has no label column".to_string()))?;

    (0..table.height())
        .map(|row| {
            label_col.data().as_label(row).ok_or_else(|| {
                RecappError::InvalidInput(format!("missing label in row {}", row))
            })
        })
        .collect()
}

/// Gather numeric columns into a row-major matrix.
fn columns_to_array2(columns: &[&TableColumn], n_rows: usize) -> Result<Array2<f64>> {
    let col_data: Vec<Vec<f64>> = columns
        .iter()
        .map(|column| {
            (0..n_rows)
                .map(|row| {
                    column.data().as_f64(row).ok_or_else(|| {
                        RecappError::InvalidInput(format!(
                            "column '{}' has no numeric value in row {}",
                            column.name(),
                            row
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, columns.len()), |(r, c)| col_data[c][r]))
}
