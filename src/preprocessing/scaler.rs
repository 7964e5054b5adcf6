//! Min-max feature scaling

use crate::error::{RecappError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Per-column min-max scaler: (x - min) / (max - min)
///
/// Fitted once from the cleaned feature matrix and reused unchanged for the
/// single inference row. A constant column keeps a range of 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: Array1<f64>,
    range: Array1<f64>,
}

impl MinMaxScaler {
    /// Fit column minima and ranges
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(RecappError::EmptyDataset("cannot fit scaler on zero rows".to_string()));
        }

        let min = x.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
        let max = x.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let range = (&max - &min).mapv(|r| if r == 0.0 { 1.0 } else { r });

        Ok(Self { min, range })
    }

    pub fn n_features(&self) -> usize {
        self.min.len()
    }

    pub fn data_min(&self) -> &Array1<f64> {
        &self.min
    }

    pub fn data_range(&self) -> &Array1<f64> {
        &self.range
    }

    /// Scale every row of `x`
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x.ncols())?;
        let mut scaled = x - &self.min;
        scaled /= &self.range;
        Ok(scaled)
    }

    /// Scale a single row
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok((&row - &self.min) / &self.range)
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.n_features() {
            return Err(RecappError::InvalidInput(format!(
                "expected {} features, got {}",
                self.n_features(),
                width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_minmax_range() {
        let x = array![[1.0, 10.0], [3.0, 20.0], [5.0, 30.0]];
        let scaler = MinMaxScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        assert_eq!(scaled.column(0).to_vec(), vec![0.0, 0.5, 1.0]);
        assert_eq!(scaled.column(1).to_vec(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_constant_column_scales_to_zero() {
        let x = array![[7.0], [7.0], [7.0]];
        let scaler = MinMaxScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();
        assert!(scaled.iter().all(|&v| v == 0.0));
        assert_eq!(scaler.data_range()[0], 1.0);
    }

    #[test]
    fn test_row_uses_fitted_state() {
        let x = array![[0.0, 100.0], [10.0, 200.0]];
        let scaler = MinMaxScaler::fit(&x).unwrap();
        let row = array![20.0, 150.0];
        let scaled = scaler.transform_row(row.view()).unwrap();
        assert_eq!(scaled.to_vec(), vec![2.0, 0.5]);
    }

    #[test]
    fn test_width_mismatch() {
        let x = array![[0.0, 1.0], [1.0, 2.0]];
        let scaler = MinMaxScaler::fit(&x).unwrap();
        let row = array![1.0];
        assert!(matches!(
            scaler.transform_row(row.view()),
            Err(RecappError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fit_requires_rows() {
        let x = Array2::<f64>::zeros((0, 2));
        assert!(matches!(MinMaxScaler::fit(&x), Err(RecappError::EmptyDataset(_))));
    }
}
