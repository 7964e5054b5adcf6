//! RECAPP - dataset-to-prediction service
//!
//! Upload one CSV dataset; every prediction request reloads it, cleans it,
//! retrains a depth-limited decision tree and predicts a single row.
//!
//! # Modules
//!
//! - [`dataset`] - CSV loading into a typed table and the single-file store
//! - [`preprocessing`] - Missing-value and IQR outlier removal, min-max scaling
//! - [`training`] - Train/test split, decision tree, classification metrics
//! - [`summary`] - Label distribution
//! - [`pipeline`] - End-to-end runner shared by the server and the CLI
//! - [`server`] - HTTP API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Pipeline stages
pub mod dataset;
pub mod preprocessing;
pub mod training;
pub mod summary;
pub mod pipeline;

// Services
pub mod server;
pub mod cli;

pub use error::{RecappError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{RecappError, Result};

    pub use crate::dataset::{DataLoader, DatasetStore, Table};
    pub use crate::preprocessing::{MinMaxScaler, OutlierDetector, PreparedData, PreprocessingConfig, Preprocessor};
    pub use crate::training::{
        ClassificationReport, DecisionTree, PredictionRequest, PredictionResult, TrainEngine, TrainingConfig,
    };
    pub use crate::summary::{label_counts, LabelCount, LabelDistribution};
    pub use crate::pipeline::{DatasetInfo, Pipeline, PipelineConfig};
}
