//! Sampling helpers shared by the models and the forecast pipeline.

pub mod bootstrap;
pub mod holdout;

pub use bootstrap::{bootstrap_indices, bootstrap_sample};
pub use holdout::{holdout_split, HoldoutConfig, HoldoutSplit};
