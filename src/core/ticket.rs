//! Ticket records and the enumerations shared by intake, generation and forecasting.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Text layout used when timestamps are persisted or rendered.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ticket category. The same closed set is used by intake, the synthetic
/// generator and the forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Network,
    Software,
    Hardware,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 3] = [Category::Network, Category::Software, Category::Hardware];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Network => "Network",
            Category::Software => "Software",
            Category::Hardware => "Hardware",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ForecastError::InvalidCategory(s.to_string()))
    }
}

/// Ticket priority. Irrelevant to forecasting, carried for intake parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown priority {s:?}"))
    }
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(TicketStatus::Open),
            "Closed" => Ok(TicketStatus::Closed),
            other => Err(format!("unknown status {other:?}")),
        }
    }
}

/// Intake payload. The store assigns the id and the initial status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub requester: String,
    pub category: Category,
    pub priority: Priority,
    pub description: String,
    pub opened_at: NaiveDateTime,
}

/// A stored ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub requester: String,
    pub category: Category,
    pub priority: Priority,
    pub description: String,
    pub status: TicketStatus,
    pub opened_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

impl Ticket {
    /// Build an open ticket from an intake payload.
    pub fn open(id: u64, new: NewTicket) -> Self {
        Self {
            id,
            requester: new.requester,
            category: new.category,
            priority: new.priority,
            description: new.description,
            status: TicketStatus::Open,
            opened_at: new.opened_at,
            closed_at: None,
        }
    }

    /// The (category, opened-at) projection the forecaster consumes.
    pub fn event(&self) -> TicketEvent {
        TicketEvent {
            category: self.category,
            opened_at: self.opened_at,
        }
    }
}

/// The only part of a ticket that matters for demand forecasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketEvent {
    pub category: Category,
    pub opened_at: NaiveDateTime,
}

impl TicketEvent {
    pub fn new(category: Category, opened_at: NaiveDateTime) -> Self {
        Self {
            category,
            opened_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn category_round_trips_through_display_name() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn category_parse_is_case_sensitive() {
        assert_eq!(
            "network".parse::<Category>(),
            Err(ForecastError::InvalidCategory("network".into()))
        );
        assert!("Printers".parse::<Category>().is_err());
    }

    #[test]
    fn new_tickets_start_open() {
        let opened_at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let ticket = Ticket::open(
            1,
            NewTicket {
                requester: "Ana Costa".into(),
                category: Category::Hardware,
                priority: Priority::Low,
                description: "Monitor flickering".into(),
                opened_at,
            },
        );

        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.closed_at.is_none());
        assert_eq!(ticket.event(), TicketEvent::new(Category::Hardware, opened_at));
    }

    #[test]
    fn priority_and_status_parse() {
        assert_eq!("Medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("Urgent".parse::<Priority>().is_err());
        assert_eq!("Closed".parse::<TicketStatus>().unwrap(), TicketStatus::Closed);
    }
}
