//! Label distribution of the stored dataset

use crate::dataset::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Occurrences of one label value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Parallel label/count arrays, as served over HTTP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub label: Vec<String>,
    pub count: Vec<usize>,
}

impl From<Vec<LabelCount>> for LabelDistribution {
    fn from(counts: Vec<LabelCount>) -> Self {
        let (label, count) = counts.into_iter().map(|c| (c.label, c.count)).unzip();
        Self { label, count }
    }
}

/// Count each distinct value of the last column.
///
/// Ordered by descending count; equal counts keep first-seen order.
/// Missing labels are skipped.
pub fn label_counts(table: &Table) -> Vec<LabelCount> {
    let Some(column) = table.last_column() else {
        return Vec::new();
    };

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();
    for label in (0..column.len()).filter_map(|row| column.data().as_label(row)) {
        match index.get(&label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push(LabelCount { label, count: 1 });
            }
        }
    }

    // stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
