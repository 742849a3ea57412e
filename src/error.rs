//! Error types for the helpdesk-forecast library.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building or running a demand forecast.
///
/// The first three variants are input-validation failures raised before any
/// history is read. Everything else is an unexpected failure during
/// aggregation or fitting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// A required request parameter was absent or blank.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// The target month did not match `YYYY-MM`.
    #[error("invalid month format: {0:?} (expected YYYY-MM)")]
    InvalidMonthFormat(String),

    /// The category is not part of the fixed enumeration.
    #[error("invalid category: {0:?}")]
    InvalidCategory(String),

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// The ticket store could not be read.
    #[error("ticket store error: {0}")]
    Store(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ForecastError {
    /// Whether the error was caused by the caller's input rather than by
    /// the pipeline itself.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForecastError::MissingParameter(_)
                | ForecastError::InvalidMonthFormat(_)
                | ForecastError::InvalidCategory(_)
        )
    }

    /// Short machine-facing label used in response bodies.
    pub fn label(&self) -> &'static str {
        match self {
            ForecastError::MissingParameter(_) => "missing parameter",
            ForecastError::InvalidMonthFormat(_) => "invalid month format",
            ForecastError::InvalidCategory(_) => "invalid category",
            _ => "forecast failed",
        }
    }
}

impl From<StoreError> for ForecastError {
    fn from(err: StoreError) -> Self {
        ForecastError::Store(err.to_string())
    }
}
