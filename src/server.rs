//! HTTP surface: forecast queries and ticket intake.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::core::{Category, NewTicket, Priority, Ticket};
use crate::forecast::{DemandForecaster, ForecastResponse};
use crate::store::{StoreError, TicketStore};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub forecaster: DemandForecaster,
    pub store: Arc<dyn TicketStore>,
}

impl AppState {
    pub fn new(forecaster: DemandForecaster, store: Arc<dyn TicketStore>) -> Self {
        Self { forecaster, store }
    }
}

/// Create the router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/forecast", get(forecast_handler))
        .route("/tickets", get(list_tickets_handler).post(open_ticket_handler))
        .route("/tickets/{id}/close", post(close_ticket_handler))
        .with_state(state)
}

/// Errors from the ticket endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("ticket {0} not found or already closed")]
    NotFound(u64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("background task failed: {0}")]
    Join(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "ticket not found", "details": self.to_string() }),
            ),
            ApiError::Store(_) | ApiError::Join(_) => {
                error!(error = %self, "Ticket request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "ticket store failed", "details": self.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub month: Option<String>,
    pub category: Option<String>,
}

async fn forecast_handler(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> (StatusCode, Json<ForecastResponse>) {
    let forecaster = state.forecaster.clone();
    let response = tokio::task::spawn_blocking(move || {
        forecaster.predict(query.month.as_deref(), query.category.as_deref())
    })
    .await
    .unwrap_or_else(|e| {
        error!(error = %e, "Forecast task panicked");
        ForecastResponse::Error {
            error: "forecast failed".to_string(),
            details: Some(e.to_string()),
        }
    });

    let status =
        StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

/// Intake body; `opened_at` defaults to the current local time.
#[derive(Debug, Deserialize)]
pub struct TicketIntake {
    pub requester: String,
    pub category: Category,
    pub priority: Priority,
    pub description: String,
    #[serde(default)]
    pub opened_at: Option<NaiveDateTime>,
}

impl TicketIntake {
    fn into_new_ticket(self, now: NaiveDateTime) -> NewTicket {
        NewTicket {
            requester: self.requester,
            category: self.category,
            priority: self.priority,
            description: self.description,
            opened_at: self.opened_at.unwrap_or(now),
        }
    }
}

async fn open_ticket_handler(
    State(state): State<AppState>,
    Json(intake): Json<TicketIntake>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let new = intake.into_new_ticket(Local::now().naive_local());
    let store = state.store.clone();
    let ticket = tokio::task::spawn_blocking(move || store.append(new))
        .await
        .map_err(|e| ApiError::Join(e.to_string()))??;

    info!(id = ticket.id, category = %ticket.category, "Ticket opened");
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn list_tickets_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let store = state.store.clone();
    let tickets = tokio::task::spawn_blocking(move || store.scan_all())
        .await
        .map_err(|e| ApiError::Join(e.to_string()))??;
    Ok(Json(tickets))
}

async fn close_ticket_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.clone();
    let closed_at = Local::now().naive_local();
    let closed = tokio::task::spawn_blocking(move || store.close(id, closed_at))
        .await
        .map_err(|e| ApiError::Join(e.to_string()))??;

    if !closed {
        return Err(ApiError::NotFound(id));
    }
    info!(id, "Ticket closed");
    Ok(Json(json!({ "id": id, "status": "Closed" })))
}
