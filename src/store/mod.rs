//! Ticket persistence.
//!
//! The forecaster only ever reads through [`TicketStore::scan_all`]; the
//! other operations exist for intake and for seeding demonstration data.

mod memory;
mod sqlite;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::core::{NewTicket, Ticket};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors raised by a ticket store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to prepare database directory {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("corrupt ticket row: {0}")]
    CorruptRow(String),
}

/// Durable list of tickets.
pub trait TicketStore: Send + Sync {
    /// Insert a ticket and return it with its assigned id.
    fn append(&self, ticket: NewTicket) -> Result<Ticket, StoreError>;

    /// Mark an open ticket as closed. Returns `false` if no open ticket has this id.
    fn close(&self, id: u64, closed_at: NaiveDateTime) -> Result<bool, StoreError>;

    /// Every stored ticket, in insertion order.
    fn scan_all(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Remove every ticket.
    fn reset(&self) -> Result<(), StoreError>;
}
