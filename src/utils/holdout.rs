//! Reproducible random train/holdout partitioning.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ForecastError, Result};

/// Configuration for a shuffled holdout split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldoutConfig {
    /// Fraction of rows assigned to the holdout, in `(0, 1)`.
    pub test_size: f64,
    /// Seed for the shuffle.
    pub seed: u64,
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
        }
    }
}

impl HoldoutConfig {
    pub fn new(test_size: f64, seed: u64) -> Self {
        Self { test_size, seed }
    }
}

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partition `0..n` into training and holdout indices.
///
/// The holdout receives `ceil(test_size * n)` rows and the training side
/// the rest. The same `n` and config always give the same partition.
///
/// # Errors
/// Returns an error if `test_size` is outside `(0, 1)` or if either side
/// would be empty.
pub fn holdout_split(n: usize, config: &HoldoutConfig) -> Result<HoldoutSplit> {
    if !(config.test_size > 0.0 && config.test_size < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            config.test_size
        )));
    }

    let n_test = (config.test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(ForecastError::InvalidParameter(format!(
            "cannot split {n} rows with test_size {}: one side would be empty",
            config.test_size
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    Ok(HoldoutSplit {
        train,
        test: permutation,
    })
}
