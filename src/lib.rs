//! # helpdesk-forecast
//!
//! Monthly ticket demand forecasting for an IT help desk.
//!
//! Tickets are reduced to a per-category monthly count series, and a random
//! forest regressor fitted on that series predicts the count for a requested
//! month. A seasonal generator supplies demonstration history, and an HTTP
//! surface exposes forecasting and ticket intake.

#![allow(clippy::needless_range_loop)]

pub mod aggregate;
pub mod config;
pub mod core;
pub mod error;
pub mod forecast;
pub mod generator;
pub mod models;
pub mod observability;
pub mod server;
pub mod store;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Category, NewTicket, OrdinalMonth, Ticket, TicketEvent, TrainingSet};
    pub use crate::error::{ForecastError, Result};
    pub use crate::forecast::{DemandForecaster, ForecastConfig, ForecastOutcome, ForecastResponse};
    pub use crate::models::{RandomForestRegressor, Regressor};
    pub use crate::store::{MemoryStore, TicketStore};
}
