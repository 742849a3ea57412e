//! SQLite-backed ticket store.
//!
//! Schema:
//! - `tickets`: one row per ticket, timestamps stored as `YYYY-MM-DD HH:MM:SS` text,
//!   enums stored by display name.

use std::path::Path;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use tracing::debug;

use super::{StoreError, TicketStore};
use crate::core::{Category, NewTicket, Priority, Ticket, TicketStatus, TIMESTAMP_FORMAT};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    requester TEXT NOT NULL,
    category TEXT NOT NULL,
    priority TEXT NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Open',
    opened_at TEXT NOT NULL,
    closed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_tickets_category ON tickets(category);
"#;

/// Ticket store persisted in a SQLite database (thread-safe).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create or open the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        debug!(path = %path.display(), "Opened ticket database");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Raw column values, converted to a [`Ticket`] outside the row callback.
struct RawTicket {
    id: i64,
    requester: String,
    category: String,
    priority: String,
    description: String,
    status: String,
    opened_at: String,
    closed_at: Option<String>,
}

impl RawTicket {
    fn into_ticket(self) -> Result<Ticket, StoreError> {
        let corrupt = |what: String| StoreError::CorruptRow(format!("ticket {}: {what}", self.id));

        let category: Category = self
            .category
            .parse()
            .map_err(|_| corrupt(format!("unknown category {:?}", self.category)))?;
        let priority: Priority = self.priority.parse().map_err(corrupt)?;
        let status: TicketStatus = self.status.parse().map_err(corrupt)?;
        let opened_at = parse_timestamp(&self.opened_at).map_err(corrupt)?;
        let closed_at = match &self.closed_at {
            Some(s) => Some(parse_timestamp(s).map_err(corrupt)?),
            None => None,
        };

        Ok(Ticket {
            id: self.id as u64,
            requester: self.requester,
            category,
            priority,
            description: self.description,
            status,
            opened_at,
            closed_at,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| format!("bad timestamp {s:?}: {e}"))
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

impl TicketStore for SqliteStore {
    fn append(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tickets (requester, category, priority, description, opened_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                ticket.requester,
                ticket.category.as_str(),
                ticket.priority.as_str(),
                ticket.description,
                format_timestamp(&ticket.opened_at),
            ],
        )?;
        let id = conn.last_insert_rowid() as u64;
        Ok(Ticket::open(id, ticket))
    }

    fn close(&self, id: u64, closed_at: NaiveDateTime) -> Result<bool, StoreError> {
        let changed = self.conn.lock().execute(
            "UPDATE tickets SET status = 'Closed', closed_at = ?1
             WHERE id = ?2 AND status = 'Open'",
            params![format_timestamp(&closed_at), id as i64],
        )?;
        Ok(changed > 0)
    }

    fn scan_all(&self) -> Result<Vec<Ticket>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, requester, category, priority, description, status, opened_at, closed_at
             FROM tickets ORDER BY id",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok(RawTicket {
                    id: row.get(0)?,
                    requester: row.get(1)?,
                    category: row.get(2)?,
                    priority: row.get(3)?,
                    description: row.get(4)?,
                    status: row.get(5)?,
                    opened_at: row.get(6)?,
                    closed_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter().map(RawTicket::into_ticket).collect()
    }

    fn reset(&self) -> Result<(), StoreError> {
        self.conn.lock().execute("DELETE FROM tickets", [])?;
        Ok(())
    }
}
