//! Regression models.

mod traits;

pub mod forest;
pub mod tree;

pub use forest::{ForestConfig, RandomForestRegressor};
pub use traits::Regressor;
pub use tree::{DecisionTreeRegressor, TreeConfig};
