//! Error types for the RECAPP pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, RecappError>;

/// Main error type for dataset handling, preprocessing and training
#[derive(Error, Debug)]
pub enum RecappError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Missing feature: {0}")]
    MissingFeature(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for RecappError {
    fn from(err: polars::error::PolarsError) -> Self {
        RecappError::Parse(err.to_string())
    }
}

impl From<ndarray::ShapeError> for RecappError {
    fn from(err: ndarray::ShapeError) -> Self {
        RecappError::Training(format!("invalid matrix shape: {}", err))
    }
}
