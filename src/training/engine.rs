//! Per-request training and inference

use super::decision_tree::DecisionTree;
use super::metrics::{accuracy_score, ClassificationReport};
use super::split::train_test_split;
use super::TrainingConfig;
use crate::error::{RecappError, Result};
use crate::preprocessing::PreparedData;
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::{debug, info};

/// Request field carrying the caller's display name
pub const NAME_FIELD: &str = "nama";

/// One row of raw feature values keyed by column key, plus a display name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub name: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl PredictionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from flat form fields; the `nama` field becomes the name.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        let name = fields.remove(NAME_FIELD);
        Self { name, fields }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Outcome of one train-and-predict run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub nama: Option<String>,
    pub accuracy: f64,
    pub prediction: String,
    pub data_train: usize,
    pub data_test: usize,
    pub report: ClassificationReport,
}

/// Sorted class list and the index of each label in it
#[derive(Debug, Clone)]
struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    fn fit(labels: &[String]) -> Self {
        let classes: BTreeSet<&String> = labels.iter().collect();
        Self {
            classes: classes.into_iter().cloned().collect(),
        }
    }

    fn encode(&self, labels: &[String]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|l| {
                self.classes
                    .binary_search(l)
                    .map_err(|_| RecappError::Training(format!("unknown class label '{}'", l)))
            })
            .collect()
    }

    fn decode(&self, class: usize) -> Result<&str> {
        self.classes
            .get(class)
            .map(String::as_str)
            .ok_or_else(|| RecappError::Training(format!("unknown class index {}", class)))
    }
}

/// Trains a fresh decision tree per request
#[derive(Debug, Clone, Default)]
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Split, fit, evaluate, then predict the request row.
    ///
    /// The tree is fit on every prepared row, including the held-out test
    /// rows it is then evaluated on, so the reported accuracy is optimistic.
    pub fn train_and_predict(&self, data: &PreparedData, request: &PredictionRequest) -> Result<PredictionResult> {
        self.config.validate()?;
        let start = Instant::now();

        let input = Self::input_row(data, request)?;

        let n = data.n_rows();
        if n < 2 {
            return Err(RecappError::Training(format!("need at least 2 rows to train, got {}", n)));
        }
        let encoder = LabelEncoder::fit(&data.labels);
        if encoder.classes.len() < 2 {
            return Err(RecappError::Training(format!(
                "label column has a single class '{}'",
                encoder.classes.first().map(String::as_str).unwrap_or_default()
            )));
        }

        let split = train_test_split(n, self.config.test_size, self.config.random_seed)?;
        let y = encoder.encode(&data.labels)?;

        let mut tree = DecisionTree::new_classifier()
            .with_max_depth(self.config.max_depth)
            .with_min_samples_leaf(self.config.min_samples_leaf)
            .with_criterion(self.config.criterion);
        tree.fit(&data.features, &y)?;
        debug!(depth = tree.get_depth(), leaves = tree.get_n_leaves(), "Decision tree fitted");

        let x_test = data.features.select(Axis(0), &split.test);
        let y_test: Vec<String> = split.test.iter().map(|&i| data.labels[i].clone()).collect();
        let y_pred: Vec<String> = tree
            .predict(&x_test)?
            .into_iter()
            .map(|class| encoder.decode(class).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;

        let accuracy = accuracy_score(&y_test, &y_pred);
        let report = ClassificationReport::new(&y_test, &y_pred);

        let scaled = data.scaler.transform_row(input.view())?;
        let prediction = encoder.decode(tree.predict_row(scaled.view())?)?.to_string();

        info!(
            rows = n,
            train = split.train.len(),
            test = split.test.len(),
            accuracy,
            prediction = %prediction,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Prediction complete"
        );

        Ok(PredictionResult {
            nama: request.name.clone(),
            accuracy,
            prediction,
            data_train: split.train.len(),
            data_test: split.test.len(),
            report,
        })
    }

    /// Raw input row in feature column order.
    pub fn input_row(data: &PreparedData, request: &PredictionRequest) -> Result<Array1<f64>> {
        data.feature_columns
            .iter()
            .map(|column| {
                let raw = request
                    .fields
                    .get(&column.key)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| RecappError::MissingFeature(column.key.clone()))?;
                raw.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
                    RecappError::InvalidInput(format!(
                        "field '{}' must be a number, got '{}'",
                        column.key, raw
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from_vec)
    }
}
