//! IQR outlier removal
//!
//! Bounds are fitted per numeric column; a row is dropped when any of its
//! numeric values falls outside its column's bounds.

use crate::dataset::Table;
use crate::error::{RecappError, Result};
use serde::{Deserialize, Serialize};

/// Fitted bounds for a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Row-level outlier filter using the interquartile range rule
#[derive(Debug, Clone)]
pub struct OutlierDetector {
    factor: f64,
    bounds: Vec<(String, OutlierBounds)>,
    is_fitted: bool,
}

impl OutlierDetector {
    /// Create an IQR detector with multiplier `factor`
    pub fn iqr(factor: f64) -> Self {
        Self {
            factor,
            bounds: Vec::new(),
            is_fitted: false,
        }
    }

    /// Compute bounds for every numeric column of `table`
    pub fn fit(&mut self, table: &Table) -> &mut Self {
        self.bounds = table
            .numeric_columns()
            .filter_map(|column| {
                let mut values: Vec<f64> = (0..column.len())
                    .filter_map(|row| column.data().as_f64(row))
                    .collect();
                values.sort_by(|a, b| a.total_cmp(b));

                let q1 = quantile(&values, 0.25)?;
                let q3 = quantile(&values, 0.75)?;
                let iqr = q3 - q1;
                Some((
                    column.key().to_string(),
                    OutlierBounds {
                        q1,
                        q3,
                        lower: q1 - self.factor * iqr,
                        upper: q3 + self.factor * iqr,
                    },
                ))
            })
            .collect();
        self.is_fitted = true;
        self
    }

    /// True for rows to keep. Missing cells never mark a row as an outlier.
    pub fn mask(&self, table: &Table) -> Result<Vec<bool>> {
        if !self.is_fitted {
            return Err(RecappError::InvalidInput("outlier detector is not fitted".to_string()));
        }

        let mut keep = vec![true; table.height()];
        for (key, bounds) in &self.bounds {
            let Some(column) = table.column_by_key(key) else {
                continue;
            };
            for (row, flag) in keep.iter_mut().enumerate() {
                if let Some(value) = column.data().as_f64(row) {
                    if !bounds.contains(value) {
                        *flag = false;
                    }
                }
            }
        }
        Ok(keep)
    }

    /// Drop every row flagged by [`mask`](Self::mask)
    pub fn transform(&self, table: &Table) -> Result<Table> {
        let keep = self.mask(table)?;
        table.filter(&keep)
    }

    pub fn fit_transform(&mut self, table: &Table) -> Result<Table> {
        self.fit(table);
        self.transform(table)
    }

    pub fn bounds(&self) -> &[(String, OutlierBounds)] {
        &self.bounds
    }
}

/// Quantile of sorted data with linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
