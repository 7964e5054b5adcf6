//! Training configuration

use super::Criterion;
use crate::error::{RecappError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the per-request decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    /// Seed for the train/test shuffle
    pub random_seed: u64,

    /// Maximum tree depth
    pub max_depth: usize,

    /// Minimum samples in each leaf
    pub min_samples_leaf: usize,

    /// Split impurity criterion
    pub criterion: Criterion,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.3,
            random_seed: 42,
            max_depth: 3,
            min_samples_leaf: 5,
            criterion: Criterion::Entropy,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(RecappError::InvalidInput(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.max_depth == 0 {
            return Err(RecappError::InvalidInput("max_depth must be at least 1".to_string()));
        }
        if self.min_samples_leaf == 0 {
            return Err(RecappError::InvalidInput("min_samples_leaf must be at least 1".to_string()));
        }
        Ok(())
    }
}
