//! In-process ticket store.

use chrono::NaiveDateTime;
use parking_lot::RwLock;

use super::{StoreError, TicketStore};
use crate::core::{NewTicket, Ticket, TicketStatus};

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    tickets: Vec<Ticket>,
}

/// Ticket store backed by a vector behind a read-write lock.
///
/// Ids keep increasing across [`TicketStore::reset`], mirroring an
/// autoincrement column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TicketStore for MemoryStore {
    fn append(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let ticket = Ticket::open(inner.next_id, ticket);
        inner.tickets.push(ticket.clone());
        Ok(ticket)
    }

    fn close(&self, id: u64, closed_at: NaiveDateTime) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        match inner
            .tickets
            .iter_mut()
            .find(|t| t.id == id && t.status == TicketStatus::Open)
        {
            Some(ticket) => {
                ticket.status = TicketStatus::Closed;
                ticket.closed_at = Some(closed_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn scan_all(&self) -> Result<Vec<Ticket>, StoreError> {
        Ok(self.inner.read().tickets.clone())
    }

    fn reset(&self) -> Result<(), StoreError> {
        self.inner.write().tickets.clear();
        Ok(())
    }
}
