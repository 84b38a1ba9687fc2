//! Ticket records and their storage.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteTicketStore;
pub use store::{NewTicket, TicketError, TicketFilter, TicketStore};
pub use types::{Ticket, TicketStatus};
