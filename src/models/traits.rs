//! Regressor trait defining the common interface for all models.

use crate::error::{ForecastError, Result};

/// Common interface for single-feature regression models.
///
/// This trait is object-safe and can be used with `Box<dyn Regressor>`.
pub trait Regressor {
    /// Fit the model to paired feature/target columns.
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()>;

    /// Predict the target for a single feature value.
    fn predict_one(&self, x: f64) -> Result<f64>;

    /// Predict the target for each feature value.
    fn predict(&self, xs: &[f64]) -> Result<Vec<f64>> {
        xs.iter().map(|&x| self.predict_one(x)).collect()
    }

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;
}

/// Shared input checks for [`Regressor::fit`] implementations.
pub(crate) fn validate_training_data(x: &[f64], y: &[f64]) -> Result<()> {
    if x.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if x.len() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(ForecastError::ComputationError(
            "training data contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_bad_input() {
        assert_eq!(validate_training_data(&[], &[]), Err(ForecastError::EmptyData));
        assert_eq!(
            validate_training_data(&[1.0, 2.0], &[1.0]),
            Err(ForecastError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
        assert!(matches!(
            validate_training_data(&[1.0, f64::NAN], &[1.0, 2.0]),
            Err(ForecastError::ComputationError(_))
        ));
        assert!(validate_training_data(&[1.0], &[3.0]).is_ok());
    }
}
