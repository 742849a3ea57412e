//! End-to-end tests: ticket log in, forecast response out.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use helpdesk_forecast::core::{Category, NewTicket, OrdinalMonth, Priority, Ticket};
use helpdesk_forecast::forecast::{
    DemandForecaster, ForecastConfig, ForecastOutcome, ForecastResponse,
    INSUFFICIENT_HISTORY_WARNING,
};
use helpdesk_forecast::generator::{initialize, GeneratorConfig};
use helpdesk_forecast::store::{MemoryStore, StoreError, TicketStore};

fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn ticket(category: Category, opened_at: NaiveDateTime) -> NewTicket {
    NewTicket {
        requester: "Ana Costa".to_string(),
        category,
        priority: Priority::Medium,
        description: "Printer not printing".to_string(),
        opened_at,
    }
}

/// Store with `counts[i]` tickets of `category` in month i+1 of 2024.
fn store_with(category: Category, counts: &[usize]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (i, &n) in counts.iter().enumerate() {
        for day in 0..n {
            store
                .append(ticket(category, at(2024, i as u32 + 1, day as u32 + 1)))
                .unwrap();
        }
    }
    store
}

fn forecaster(store: Arc<MemoryStore>) -> DemandForecaster {
    DemandForecaster::new(store, ForecastConfig::default())
}

#[test]
fn test_six_months_of_history_predicts_within_observed_range() {
    let f = forecaster(store_with(Category::Network, &[2, 3, 2, 5, 4, 6]));

    let response = f.predict(Some("2024-07"), Some("Network"));
    assert_eq!(response.status(), 200);
    match response {
        ForecastResponse::Prediction { predicted_count } => {
            assert!(
                (2..=6).contains(&predicted_count),
                "prediction {predicted_count} outside observed counts"
            );
        }
        other => panic!("expected a prediction, got {other:?}"),
    }
}

#[test]
fn test_report_counts_rows() {
    let f = forecaster(store_with(Category::Network, &[2, 3, 2, 5, 4, 6]));
    let month = OrdinalMonth::parse("2024-07").unwrap();

    match f.forecast(month, Category::Network).unwrap() {
        ForecastOutcome::Predicted(report) => {
            assert_eq!(report.history_rows, 6);
            assert_eq!(report.holdout_rows, 2);
            assert_eq!(report.train_rows, 4);
            assert_eq!(report.predicted_count, report.raw_prediction.trunc() as i64);
        }
        other => panic!("expected a prediction, got {other:?}"),
    }
}

#[test]
fn test_four_months_warn_five_months_predict() {
    let four = forecaster(store_with(Category::Software, &[3, 1, 4, 1]));
    assert_eq!(
        four.predict(Some("2024-06"), Some("Software")),
        ForecastResponse::Warning {
            warning: INSUFFICIENT_HISTORY_WARNING.to_string()
        }
    );

    let five = forecaster(store_with(Category::Software, &[3, 1, 4, 1, 5]));
    let response = five.predict(Some("2024-06"), Some("Software"));
    assert!(matches!(response, ForecastResponse::Prediction { .. }));
}

#[test]
fn test_category_without_tickets_warns() {
    let f = forecaster(store_with(Category::Network, &[2, 3, 2, 5, 4, 6]));
    let response = f.predict(Some("2024-07"), Some("Hardware"));

    assert_eq!(response.status(), 200);
    assert!(matches!(response, ForecastResponse::Warning { .. }));
}

#[test]
fn test_other_categories_do_not_leak_into_history() {
    let store = store_with(Category::Network, &[2, 3, 2, 5, 4, 6]);
    let baseline = forecaster(store.clone()).predict(Some("2024-07"), Some("Network"));

    for day in 1..=20 {
        store.append(ticket(Category::Hardware, at(2024, 3, day))).unwrap();
    }
    let after = forecaster(store).predict(Some("2024-07"), Some("Network"));

    assert_eq!(baseline, after);
}

#[test]
fn test_repeated_requests_are_deterministic() {
    let f = forecaster(store_with(Category::Hardware, &[5, 9, 4, 8, 7, 3, 6, 10]));

    let first = f.predict(Some("2024-09"), Some("Hardware"));
    for _ in 0..3 {
        assert_eq!(f.predict(Some("2024-09"), Some("Hardware")), first);
    }
}

#[test]
fn test_insertion_order_does_not_change_prediction() {
    let counts = [5usize, 9, 4, 8, 7, 3];

    let forward = store_with(Category::Network, &counts);

    let reversed = Arc::new(MemoryStore::new());
    for (i, &n) in counts.iter().enumerate().rev() {
        for day in (0..n).rev() {
            reversed
                .append(ticket(Category::Network, at(2024, i as u32 + 1, day as u32 + 1)))
                .unwrap();
        }
    }

    assert_eq!(
        forecaster(forward).predict(Some("2024-07"), Some("Network")),
        forecaster(reversed).predict(Some("2024-07"), Some("Network")),
    );
}

#[test]
fn test_invalid_input_is_rejected_without_details() {
    let f = forecaster(store_with(Category::Network, &[2, 3, 2, 5, 4, 6]));

    let cases = [
        (None, Some("Network"), "missing parameter"),
        (Some("2024-07"), None, "missing parameter"),
        (Some(""), Some("Network"), "missing parameter"),
        (Some("2024/07"), Some("Network"), "invalid month format"),
        (Some("2024-13"), Some("Network"), "invalid month format"),
        (Some("July"), Some("Network"), "invalid month format"),
        (Some("2024-07"), Some("network"), "invalid category"),
        (Some("2024-07"), Some("Printers"), "invalid category"),
    ];

    for (month, category, label) in cases {
        let response = f.predict(month, category);
        assert_eq!(response.status(), 400, "{month:?} {category:?}");
        assert_eq!(
            response,
            ForecastResponse::Error {
                error: label.to_string(),
                details: None
            }
        );
    }
}

struct BrokenStore;

impl TicketStore for BrokenStore {
    fn append(&self, _ticket: NewTicket) -> Result<Ticket, StoreError> {
        Err(StoreError::CorruptRow("read-only".into()))
    }

    fn close(&self, _id: u64, _closed_at: NaiveDateTime) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn scan_all(&self) -> Result<Vec<Ticket>, StoreError> {
        Err(StoreError::CorruptRow("unreadable page".into()))
    }

    fn reset(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[test]
fn test_store_failure_is_a_forecast_failure() {
    let f = DemandForecaster::new(Arc::new(BrokenStore), ForecastConfig::default());

    let response = f.predict(Some("2024-07"), Some("Network"));
    assert_eq!(response.status(), 500);
    match response {
        ForecastResponse::Error { error, details } => {
            assert_eq!(error, "forecast failed");
            assert!(details.unwrap().contains("unreadable page"));
        }
        other => panic!("expected an error, got {other:?}"),
    }
}

#[test]
fn test_validation_runs_before_store_is_read() {
    let f = DemandForecaster::new(Arc::new(BrokenStore), ForecastConfig::default());

    let response = f.predict(Some("2024/07"), Some("Network"));
    assert_eq!(response.status(), 400);
}

#[test]
fn test_seeded_history_supports_forecasting() {
    let store = Arc::new(MemoryStore::new());
    let config = GeneratorConfig::new(600).with_seed(11);
    initialize(store.as_ref(), &config, at(2025, 1, 15)).unwrap();

    let f = DemandForecaster::new(store, ForecastConfig::default());
    for category in ["Network", "Software", "Hardware"] {
        let response = f.predict(Some("2025-06"), Some(category));
        match response {
            ForecastResponse::Prediction { predicted_count } => assert!(predicted_count >= 0),
            other => panic!("expected a prediction for {category}, got {other:?}"),
        }
    }
}
