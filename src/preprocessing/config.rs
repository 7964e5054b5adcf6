//! Preprocessing configuration

use crate::dataset::column_key;
use crate::error::{RecappError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for dataset cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// IQR multiplier for outlier bounds: [Q1 - k*IQR, Q3 + k*IQR]
    pub iqr_factor: f64,

    /// Numeric column that identifies rows and is never a feature
    pub id_column: String,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            iqr_factor: 1.5,
            id_column: "no".to_string(),
        }
    }
}

impl PreprocessingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the outlier multiplier
    pub fn with_iqr_factor(mut self, factor: f64) -> Self {
        self.iqr_factor = factor;
        self
    }

    /// Builder method to set the identifier column name
    pub fn with_id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = name.into();
        self
    }

    /// Normalized key of the identifier column
    pub fn id_key(&self) -> String {
        column_key(&self.id_column)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.iqr_factor.is_finite() || self.iqr_factor < 0.0 {
            return Err(RecappError::InvalidInput(format!(
                "iqr_factor must be a non-negative number, got {}",
                self.iqr_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreprocessingConfig::default();
        assert_eq!(config.iqr_factor, 1.5);
        assert_eq!(config.id_key(), "no");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PreprocessingConfig::new()
            .with_iqr_factor(3.0)
            .with_id_column("Row ID");
        assert_eq!(config.iqr_factor, 3.0);
        assert_eq!(config.id_key(), "row_id");
    }

    #[test]
    fn test_negative_factor_rejected() {
        let config = PreprocessingConfig::new().with_iqr_factor(-1.0);
        assert!(matches!(config.validate(), Err(RecappError::InvalidInput(_))));
    }
}
