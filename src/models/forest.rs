//! Bagged ensemble of regression trees (random forest regressor).
//!
//! Every tree is grown on a bootstrap sample of the training rows and the
//! forest predicts the mean of its trees. With one input feature there is no
//! feature subsampling, so the bootstrap is the only source of randomness and
//! a fixed seed makes the whole fit reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{ForecastError, Result};
use crate::models::traits::validate_training_data;
use crate::models::tree::{DecisionTreeRegressor, TreeConfig};
use crate::models::Regressor;
use crate::utils::bootstrap_sample;

/// Configuration for a [`RandomForestRegressor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestConfig {
    /// Number of trees.
    pub n_estimators: usize,
    /// Seed for the bootstrap draws.
    pub seed: u64,
    /// Growth limits applied to every tree.
    pub tree: TreeConfig,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            tree: TreeConfig::default(),
        }
    }
}

impl ForestConfig {
    pub fn new(n_estimators: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            seed,
            ..Default::default()
        }
    }
}

/// Random forest regressor.
#[derive(Debug, Clone, Default)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<DecisionTreeRegressor>,
}

impl RandomForestRegressor {
    /// Forest with 100 fully grown trees and seed 42.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        validate_training_data(x, y)?;
        if self.config.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for _ in 0..self.config.n_estimators {
            let (xs, ys) = bootstrap_sample(x, y, &mut rng);
            let mut tree = DecisionTreeRegressor::with_config(self.config.tree);
            tree.fit(&xs, &ys)?;
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    fn predict_one(&self, x: f64) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ForecastError::FitRequired);
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_one(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        "RandomForest"
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}
