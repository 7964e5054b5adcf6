//! Model training module
//!
//! Trains a fresh decision tree for every prediction request:
//! - Seeded train/test split
//! - Entropy decision tree with depth and leaf-size limits
//! - Accuracy and per-class classification report
//! - Single-row inference on the scaled request

mod config;
mod engine;
pub mod decision_tree;
pub mod metrics;
pub mod split;

pub use config::TrainingConfig;
pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use engine::{PredictionRequest, PredictionResult, TrainEngine, NAME_FIELD};
pub use metrics::{accuracy_score, AverageMetrics, ClassMetrics, ClassificationReport};
pub use split::{train_test_split, TrainTestSplit};
