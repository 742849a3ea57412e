//! Regression tree over a single numeric feature.
//!
//! Splits are chosen greedily to minimise the squared error of the two
//! children. Candidate thresholds lie halfway between adjacent distinct
//! feature values, and a sample goes left when `x <= threshold`. Leaves
//! predict the mean target of their samples.

use crate::error::{ForecastError, Result};
use crate::models::traits::validate_training_data;
use crate::models::Regressor;

/// Growth limits for a [`DecisionTreeRegressor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum depth (`None` grows until leaves are pure or too small).
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may be split.
    pub min_samples_split: usize,
    /// Minimum samples each child must keep.
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// CART regression tree with one input feature.
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeRegressor {
    config: TreeConfig,
    nodes: Vec<Node>,
}

impl DecisionTreeRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
        }
    }

    /// Number of nodes (splits and leaves).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Grow the subtree for `xs`/`ys` (sorted by `xs`) and return its root index.
    fn grow(&mut self, xs: &[f64], ys: &[f64], depth: usize) -> usize {
        let idx = self.nodes.len();
        let value = ys.iter().sum::<f64>() / ys.len() as f64;
        self.nodes.push(Node::Leaf { value });

        if let Some((at, threshold)) = self.best_split(xs, ys, depth) {
            let left = self.grow(&xs[..at], &ys[..at], depth + 1);
            let right = self.grow(&xs[at..], &ys[at..], depth + 1);
            self.nodes[idx] = Node::Split {
                threshold,
                left,
                right,
            };
        }

        idx
    }

    /// Best split position for sorted samples, as (left size, threshold).
    ///
    /// Maximising `sum_l^2 / n_l + sum_r^2 / n_r` is equivalent to
    /// minimising the children's total squared error.
    fn best_split(&self, xs: &[f64], ys: &[f64], depth: usize) -> Option<(usize, f64)> {
        let n = xs.len();
        let cfg = &self.config;

        if n < cfg.min_samples_split.max(2) || cfg.max_depth.is_some_and(|d| depth >= d) {
            return None;
        }
        if ys.iter().all(|&y| y == ys[0]) {
            return None;
        }

        let total: f64 = ys.iter().sum();
        let min_leaf = cfg.min_samples_leaf.max(1);
        let mut left_sum = 0.0;
        let mut best: Option<(usize, f64)> = None;
        let mut best_score = f64::NEG_INFINITY;

        for i in 1..n {
            left_sum += ys[i - 1];
            if xs[i - 1] == xs[i] || i < min_leaf || n - i < min_leaf {
                continue;
            }
            let right_sum = total - left_sum;
            let score = left_sum * left_sum / i as f64 + right_sum * right_sum / (n - i) as f64;
            if score > best_score {
                best_score = score;
                best = Some((i, (xs[i - 1] + xs[i]) / 2.0));
            }
        }

        best
    }
}

impl Regressor for DecisionTreeRegressor {
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        validate_training_data(x, y)?;

        let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

        self.nodes.clear();
        self.grow(&xs, &ys, 0);
        Ok(())
    }

    fn predict_one(&self, x: f64) -> Result<f64> {
        if self.nodes.is_empty() {
            return Err(ForecastError::FitRequired);
        }

        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return Ok(value),
                Node::Split {
                    threshold,
                    left,
                    right,
                } => idx = if x <= threshold { left } else { right },
            }
        }
    }

    fn name(&self) -> &str {
        "DecisionTree"
    }

    fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }
}
