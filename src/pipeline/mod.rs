//! End-to-end pipeline: load, clean, train, predict
//!
//! Shared by the HTTP handlers and the CLI so both run the exact same steps.

use crate::dataset::{DataLoader, FeatureColumn, Table};
use crate::error::Result;
use crate::preprocessing::{PreprocessingConfig, Preprocessor};
use crate::summary::{label_counts, LabelCount};
use crate::training::{PredictionRequest, PredictionResult, TrainEngine, TrainingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Preprocessing and training settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub preprocessing: PreprocessingConfig,
    pub training: TrainingConfig,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preprocessing(mut self, config: PreprocessingConfig) -> Self {
        self.preprocessing = config;
        self
    }

    pub fn with_training(mut self, config: TrainingConfig) -> Self {
        self.training = config;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.preprocessing.validate()?;
        self.training.validate()
    }
}

/// Shape of a stored dataset and the fields a prediction request needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub filename: String,
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub input_label: Vec<FeatureColumn>,
}

impl DatasetInfo {
    pub fn describe(file_name: impl Into<String>, table: &Table) -> Self {
        Self {
            filename: file_name.into(),
            rows: table.height(),
            columns: table.width(),
            column_names: table.column_names(),
            input_label: table.input_fields(),
        }
    }
}

/// Runs every stage from raw CSV bytes; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    loader: DataLoader,
    preprocessor: Preprocessor,
    engine: TrainEngine,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            loader: DataLoader::new(),
            preprocessor: Preprocessor::with_config(config.preprocessing),
            engine: TrainEngine::new(config.training),
        }
    }

    pub fn with_loader(mut self, loader: DataLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub fn load(&self, bytes: &[u8]) -> Result<Table> {
        self.loader.load_bytes(bytes)
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Table> {
        self.loader.load_path(path)
    }

    /// Clean the table, retrain and predict the request row.
    pub fn predict_table(&self, table: &Table, request: &PredictionRequest) -> Result<PredictionResult> {
        let prepared = self.preprocessor.clean(table)?;
        self.engine.train_and_predict(&prepared, request)
    }

    pub fn predict(&self, bytes: &[u8], request: &PredictionRequest) -> Result<PredictionResult> {
        self.predict_table(&self.load(bytes)?, request)
    }

    pub fn summarize(&self, bytes: &[u8]) -> Result<Vec<LabelCount>> {
        Ok(label_counts(&self.load(bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecappError;

    const CSV: &str = "no,name,height,weight,category\n\
        1,a,150,45,s\n2,b,152,47,s\n3,c,155,50,s\n4,d,157,52,s\n5,e,158,53,s\n\
        6,f,170,65,l\n7,g,172,68,l\n8,h,175,70,l\n9,i,176,72,l\n10,j,178,74,l\n";

    #[test]
    fn test_config_validate() {
        assert!(PipelineConfig::default().validate().is_ok());
        let bad = PipelineConfig::new().with_training(TrainingConfig::new().with_max_depth(0));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_describe() {
        let pipeline = Pipeline::default();
        let table = pipeline.load(CSV.as_bytes()).unwrap();
        let info = DatasetInfo::describe("body.csv", &table);
        assert_eq!(info.rows, 10);
        assert_eq!(info.columns, 5);
        let keys: Vec<&str> = info.input_label.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["height", "weight"]);
    }

    #[test]
    fn test_predict_end_to_end() {
        let pipeline = Pipeline::default();
        let request = PredictionRequest::new()
            .with_name("Ana")
            .with_field("height", "177")
            .with_field("weight", "73");
        let result = pipeline.predict(CSV.as_bytes(), &request).unwrap();
        assert_eq!(result.prediction, "l");
        assert_eq!(result.data_train + result.data_test, 10);
    }

    #[test]
    fn test_summarize() {
        let counts = Pipeline::default().summarize(CSV.as_bytes()).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].label, "s");
        assert_eq!(counts[0].count, 5);
    }

    #[test]
    fn test_predict_missing_field() {
        let request = PredictionRequest::new().with_field("height", "177");
        let result = Pipeline::default().predict(CSV.as_bytes(), &request);
        assert!(matches!(result, Err(RecappError::MissingFeature(ref k)) if k == "weight"));
    }
}
