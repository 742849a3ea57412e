//! Bootstrap resampling for bagged models.
//!
//! Each member of a bagged ensemble is trained on a sample of the training
//! rows drawn with replacement, the same size as the original set.

use rand::Rng;

/// Draw `n` row indices uniformly from `0..n`, with replacement.
pub fn bootstrap_indices(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

/// Resample paired feature/target columns with replacement.
pub fn bootstrap_sample(x: &[f64], y: &[f64], rng: &mut impl Rng) -> (Vec<f64>, Vec<f64>) {
    let indices = bootstrap_indices(x.len().min(y.len()), rng);
    let xs = indices.iter().map(|&i| x[i]).collect();
    let ys = indices.iter().map(|&i| y[i]).collect();
    (xs, ys)
}
