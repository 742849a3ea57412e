//! Monthly demand forecast for one ticket category.
//!
//! A forecast request is served from scratch every time: the ticket log is
//! scanned, reduced to a per-category monthly series, checked for
//! sufficiency, and a fresh random forest is fitted and queried once. No
//! model outlives the request.
//!
//! # Outcomes
//!
//! - Invalid input (missing parameter, bad month, unknown category) is a
//!   [`ForecastError`] raised before the store is read.
//! - Too little history is a normal [`ForecastOutcome::InsufficientHistory`]
//!   value, not an error.
//! - Anything that goes wrong while reading or fitting is a [`ForecastError`]
//!   that callers report as a generic failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::aggregate::training_set;
use crate::core::{Category, OrdinalMonth, TrainingSet};
use crate::error::{ForecastError, Result};
use crate::models::{ForestConfig, RandomForestRegressor, Regressor};
use crate::store::TicketStore;
use crate::utils::{holdout_split, HoldoutConfig};

/// Message carried by the insufficient-history response.
pub const INSUFFICIENT_HISTORY_WARNING: &str = "insufficient historical data";

/// Forecast tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Fewest monthly rows a category needs before a model is fitted.
    pub min_history: usize,
    /// Trees in the forest.
    pub n_estimators: usize,
    /// Fraction of rows held out from training.
    pub test_size: f64,
    /// Seed shared by the holdout shuffle and the forest.
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_history: 5,
            n_estimators: 100,
            test_size: 0.2,
            seed: 42,
        }
    }
}

impl ForecastConfig {
    /// Check that every request can be split and fitted under this config.
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be at least 1".into(),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        let holdout = (self.test_size * self.min_history as f64).ceil() as usize;
        if self.min_history < 2 || holdout >= self.min_history {
            return Err(ForecastError::InvalidParameter(format!(
                "min_history {} leaves no training rows at test_size {}",
                self.min_history, self.test_size
            )));
        }
        Ok(())
    }
}

/// Result of the sufficiency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sufficiency {
    Sufficient,
    Insufficient { rows: usize, required: usize },
}

/// Gate that refuses to fit on too little history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SufficiencyGuard {
    min_rows: usize,
}

impl Default for SufficiencyGuard {
    fn default() -> Self {
        Self { min_rows: 5 }
    }
}

impl SufficiencyGuard {
    pub fn new(min_rows: usize) -> Self {
        Self { min_rows }
    }

    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    pub fn evaluate(&self, set: &TrainingSet) -> Sufficiency {
        if set.len() < self.min_rows {
            Sufficiency::Insufficient {
                rows: set.len(),
                required: self.min_rows,
            }
        } else {
            Sufficiency::Sufficient
        }
    }
}

/// A successful prediction and how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub month: OrdinalMonth,
    /// Model output truncated toward zero. Not clamped.
    pub predicted_count: i64,
    /// Model output before truncation.
    pub raw_prediction: f64,
    /// Monthly rows available for the category.
    pub history_rows: usize,
    pub train_rows: usize,
    /// Rows held out of training. They are not scored.
    pub holdout_rows: usize,
}

/// What a forecast request produced, short of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Predicted(ForecastReport),
    InsufficientHistory { rows: usize, required: usize },
}

/// Fit a fresh forest on `set` and predict the count for `target`.
///
/// Rows are put in calendar order first, so the result depends only on the
/// set's contents. The holdout partition is computed and excluded from
/// training but not otherwise used.
pub fn fit_and_predict(
    set: &TrainingSet,
    target: OrdinalMonth,
    config: &ForecastConfig,
) -> Result<ForecastReport> {
    if set.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let mut rows = set.clone();
    rows.sort_by_month();

    let split = holdout_split(rows.len(), &HoldoutConfig::new(config.test_size, config.seed))?;
    let train = rows.select(&split.train);

    let mut model =
        RandomForestRegressor::with_config(ForestConfig::new(config.n_estimators, config.seed));
    model.fit(&train.features(), &train.targets())?;

    let raw = model.predict_one(target.feature())?;
    if !raw.is_finite() {
        return Err(ForecastError::ComputationError(format!(
            "model produced a non-finite prediction ({raw})"
        )));
    }

    Ok(ForecastReport {
        month: target,
        predicted_count: raw.trunc() as i64,
        raw_prediction: raw,
        history_rows: rows.len(),
        train_rows: split.train.len(),
        holdout_rows: split.test.len(),
    })
}

/// Check raw request parameters. Blank strings count as missing.
pub fn validate_request(
    month: Option<&str>,
    category: Option<&str>,
) -> Result<(OrdinalMonth, Category)> {
    let month = month
        .filter(|s| !s.trim().is_empty())
        .ok_or(ForecastError::MissingParameter("month"))?;
    let category = category
        .filter(|s| !s.trim().is_empty())
        .ok_or(ForecastError::MissingParameter("category"))?;

    Ok((OrdinalMonth::parse(month)?, category.parse()?))
}

/// Serves forecast requests against a ticket store.
#[derive(Clone)]
pub struct DemandForecaster {
    store: Arc<dyn TicketStore>,
    config: ForecastConfig,
}

impl DemandForecaster {
    pub fn new(store: Arc<dyn TicketStore>, config: ForecastConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Current training set for a category, read fresh from the store.
    pub fn history(&self, category: Category) -> Result<TrainingSet> {
        let tickets = self.store.scan_all()?;
        Ok(training_set(tickets.iter().map(|t| t.event()), category))
    }

    /// Forecast ticket volume for `category` in `month`.
    pub fn forecast(&self, month: OrdinalMonth, category: Category) -> Result<ForecastOutcome> {
        let history = self.history(category)?;
        debug!(%category, rows = history.len(), "Aggregated monthly history");

        let guard = SufficiencyGuard::new(self.config.min_history);
        if let Sufficiency::Insufficient { rows, required } = guard.evaluate(&history) {
            info!(%month, %category, rows, required, "Not enough history to forecast");
            return Ok(ForecastOutcome::InsufficientHistory { rows, required });
        }

        let report = fit_and_predict(&history, month, &self.config)?;
        info!(
            %month,
            %category,
            predicted = report.predicted_count,
            train_rows = report.train_rows,
            holdout_rows = report.holdout_rows,
            "Forecast computed"
        );
        Ok(ForecastOutcome::Predicted(report))
    }

    /// Validate raw parameters, forecast, and fold every path into a response.
    pub fn predict(&self, month: Option<&str>, category: Option<&str>) -> ForecastResponse {
        let result = validate_request(month, category)
            .and_then(|(month, category)| self.forecast(month, category));

        match result {
            Ok(outcome) => ForecastResponse::from(outcome),
            Err(err) if err.is_validation() => {
                debug!(error = %err, "Rejected forecast request");
                ForecastResponse::from(err)
            }
            Err(err) => {
                error!(error = %err, "Forecast failed");
                ForecastResponse::from(err)
            }
        }
    }
}

/// Wire form of a forecast result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastResponse {
    Prediction {
        predicted_count: i64,
    },
    Warning {
        warning: String,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl ForecastResponse {
    /// HTTP-equivalent status: 200 for answers and warnings, 400 for bad
    /// input, 500 for failures.
    pub fn status(&self) -> u16 {
        match self {
            ForecastResponse::Prediction { .. } | ForecastResponse::Warning { .. } => 200,
            ForecastResponse::Error { details: None, .. } => 400,
            ForecastResponse::Error { details: Some(_), .. } => 500,
        }
    }
}

impl From<ForecastOutcome> for ForecastResponse {
    fn from(outcome: ForecastOutcome) -> Self {
        match outcome {
            ForecastOutcome::Predicted(report) => ForecastResponse::Prediction {
                predicted_count: report.predicted_count,
            },
            ForecastOutcome::InsufficientHistory { .. } => ForecastResponse::Warning {
                warning: INSUFFICIENT_HISTORY_WARNING.to_string(),
            },
        }
    }
}

impl From<ForecastError> for ForecastResponse {
    fn from(err: ForecastError) -> Self {
        let details = (!err.is_validation()).then(|| err.to_string());
        ForecastResponse::Error {
            error: err.label().to_string(),
            details,
        }
    }
}
