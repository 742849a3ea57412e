//! SQLite-backed store tests against a real file.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use helpdesk_forecast::core::{Category, NewTicket, Priority, TicketStatus};
use helpdesk_forecast::forecast::{DemandForecaster, ForecastConfig, ForecastResponse};
use helpdesk_forecast::generator::{initialize, GeneratorConfig};
use helpdesk_forecast::store::{SqliteStore, TicketStore};
use tempfile::TempDir;

fn at(month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .unwrap()
        .and_hms_opt(14, 5, 9)
        .unwrap()
}

fn new_ticket(category: Category, opened_at: NaiveDateTime) -> NewTicket {
    NewTicket {
        requester: "Marcos Souza".to_string(),
        category,
        priority: Priority::High,
        description: "Server not responding".to_string(),
        opened_at,
    }
}

#[test]
fn test_tickets_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("tickets.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.append(new_ticket(Category::Network, at(1, 2))).unwrap();
        store.append(new_ticket(Category::Hardware, at(2, 3))).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let tickets = store.scan_all().unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].category, Category::Network);
    assert_eq!(tickets[0].opened_at, at(1, 2));
    assert_eq!(tickets[1].status, TicketStatus::Open);
}

#[test]
fn test_close_is_persisted_once() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&dir.path().join("tickets.db")).unwrap();
    let ticket = store.append(new_ticket(Category::Software, at(3, 1))).unwrap();

    assert!(store.close(ticket.id, at(3, 2)).unwrap());
    assert!(!store.close(ticket.id, at(3, 3)).unwrap());

    let stored = &store.scan_all().unwrap()[0];
    assert_eq!(stored.status, TicketStatus::Closed);
    assert_eq!(stored.closed_at, Some(at(3, 2)));
}

#[test]
fn test_forecast_over_sqlite_history() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::open(&dir.path().join("tickets.db")).unwrap());
    for (i, n) in [2u32, 3, 2, 5, 4, 6].into_iter().enumerate() {
        for day in 1..=n {
            store
                .append(new_ticket(Category::Network, at(i as u32 + 1, day)))
                .unwrap();
        }
    }

    let forecaster = DemandForecaster::new(store, ForecastConfig::default());
    match forecaster.predict(Some("2024-07"), Some("Network")) {
        ForecastResponse::Prediction { predicted_count } => {
            assert!((2..=6).contains(&predicted_count))
        }
        other => panic!("expected a prediction, got {other:?}"),
    }
}

#[test]
fn test_initialize_reseeds_file_store() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&dir.path().join("tickets.db")).unwrap();
    store.append(new_ticket(Category::Network, at(1, 1))).unwrap();

    let config = GeneratorConfig::new(40).with_seed(8);
    let inserted = initialize(&store, &config, at(12, 31)).unwrap();

    assert_eq!(inserted, 40);
    assert_eq!(store.scan_all().unwrap().len(), 40);
}
