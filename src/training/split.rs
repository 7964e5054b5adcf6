//! Seeded train/test partitioning

use crate::error::{RecappError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of each partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with `seed` and hold out `ceil(test_size * n)` rows.
///
/// The first `n_test` shuffled indices form the test partition, the rest the
/// training partition. Both partitions must be non-empty.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(RecappError::InvalidInput(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(RecappError::Training(format!(
            "cannot split {} rows with test_size {}: train={}, test={}",
            n_samples, test_size, n_train, n_test
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit { train, test: indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(10, 0.3, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 7);

        let split = train_test_split(11, 0.3, 42).unwrap();
        assert_eq!(split.test.len(), 4);
        assert_eq!(split.train.len(), 7);
    }

    #[test]
    fn test_split_is_partition() {
        let split = train_test_split(25, 0.3, 7).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_reproducible() {
        assert_eq!(train_test_split(50, 0.3, 42).unwrap(), train_test_split(50, 0.3, 42).unwrap());
    }

    #[test]
    fn test_split_too_small() {
        assert!(matches!(train_test_split(1, 0.3, 42), Err(RecappError::Training(_))));
        assert!(matches!(train_test_split(0, 0.3, 42), Err(RecappError::Training(_))));
    }
}
