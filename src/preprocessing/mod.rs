//! Data preprocessing module
//!
//! Turns the raw dataset table into a training-ready feature matrix:
//! - Missing value removal
//! - IQR outlier removal across every numeric column
//! - Numeric feature selection
//! - Min-max scaling to [0, 1]

mod config;
mod pipeline;
mod scaler;
pub mod outlier;

pub use config::PreprocessingConfig;
pub use outlier::{OutlierBounds, OutlierDetector};
pub use pipeline::{PreparedData, Preprocessor};
pub use scaler::MinMaxScaler;
