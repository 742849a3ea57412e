//! Core data structures for ticket history and demand forecasting.

mod month;
mod ticket;
mod training_set;

pub use month::OrdinalMonth;
pub use ticket::{
    Category, NewTicket, Priority, Ticket, TicketEvent, TicketStatus, TIMESTAMP_FORMAT,
};
pub use training_set::{MonthlyCount, Observation, TrainingSet};
