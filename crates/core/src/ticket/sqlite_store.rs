//! SQLite-backed ticket store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{NewTicket, Ticket, TicketError, TicketFilter, TicketStatus, TicketStore};

const TICKET_COLUMNS: &str = "id, customer_email, description, product_purchased, issue_type, \
     tracker_issue_key, email_draft, status, notification_sent, email_sent, created_at, updated_at";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
    /// Create a new SQLite ticket store, creating the database file and
    /// tables if needed.
    pub fn new(path: &Path) -> Result<Self, TicketError> {
        let conn = Connection::open(path).map_err(|e| TicketError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite ticket store (useful for testing).
    pub fn in_memory() -> Result<Self, TicketError> {
        let conn =
            Connection::open_in_memory().map_err(|e| TicketError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), TicketError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_email TEXT NOT NULL,
                description TEXT NOT NULL,
                product_purchased TEXT,
                issue_type TEXT,
                tracker_issue_key TEXT,
                email_draft TEXT,
                status TEXT NOT NULL,
                notification_sent INTEGER NOT NULL DEFAULT 0,
                email_sent INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_customer_email ON tickets(customer_email);
            CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
            "#,
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let created_at_str: String = row.get(10)?;
        let updated_at_str: String = row.get(11)?;

        // Timestamps were written by us in RFC 3339; fall back to now on
        // malformed data rather than failing the whole query.
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let status_str: String = row.get(7)?;
        let status = TicketStatus::parse(&status_str).unwrap_or(TicketStatus::Open);

        Ok(Ticket {
            id: row.get(0)?,
            customer_email: row.get(1)?,
            description: row.get(2)?,
            product_purchased: row.get(3)?,
            issue_type: row.get(4)?,
            tracker_issue_key: row.get(5)?,
            email_draft: row.get(6)?,
            status,
            notification_sent: row.get::<_, i64>(8)? != 0,
            email_sent: row.get::<_, i64>(9)? != 0,
            created_at,
            updated_at,
        })
    }

    fn get_required(conn: &Connection, id: i64) -> Result<Ticket, TicketError> {
        let result = conn.query_row(
            &format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS),
            params![id],
            Self::row_to_ticket,
        );

        match result {
            Ok(ticket) => Ok(ticket),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(TicketError::NotFound(id)),
            Err(e) => Err(TicketError::Database(e.to_string())),
        }
    }

    /// Read-modify-write for a single ticket: `apply` mutates the in-memory
    /// record, then the mutable columns are written back in one statement.
    fn update_ticket<F>(&self, id: i64, apply: F) -> Result<Ticket, TicketError>
    where
        F: FnOnce(&mut Ticket),
    {
        let conn = self.conn.lock().unwrap();

        let mut ticket = Self::get_required(&conn, id)?;
        apply(&mut ticket);
        ticket.updated_at = Utc::now();

        conn.execute(
            "UPDATE tickets SET issue_type = ?, tracker_issue_key = ?, email_draft = ?, \
             status = ?, notification_sent = ?, email_sent = ?, updated_at = ? WHERE id = ?",
            params![
                ticket.issue_type,
                ticket.tracker_issue_key,
                ticket.email_draft,
                ticket.status.as_str(),
                ticket.notification_sent as i64,
                ticket.email_sent as i64,
                ticket.updated_at.to_rfc3339(),
                id,
            ],
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(ticket)
    }
}

impl TicketStore for SqliteTicketStore {
    fn create(&self, request: NewTicket) -> Result<Ticket, TicketError> {
        let conn = self.conn.lock().unwrap();

        let now = Utc::now();
        let status = TicketStatus::Open;

        conn.execute(
            "INSERT INTO tickets (customer_email, description, product_purchased, status, \
             notification_sent, email_sent, created_at, updated_at) VALUES (?, ?, ?, ?, 0, 0, ?, ?)",
            params![
                request.customer_email,
                request.description,
                request.product_purchased,
                status.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;

        let id = conn.last_insert_rowid();

        Ok(Ticket {
            id,
            customer_email: request.customer_email,
            description: request.description,
            product_purchased: request.product_purchased,
            issue_type: None,
            tracker_issue_key: None,
            email_draft: None,
            status,
            notification_sent: false,
            email_sent: false,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: i64) -> Result<Option<Ticket>, TicketError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS),
            params![id],
            Self::row_to_ticket,
        );

        match result {
            Ok(ticket) => Ok(Some(ticket)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TicketError::Database(e.to_string())),
        }
    }

    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!("SELECT {} FROM tickets", TICKET_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(ref status) = filter.status {
            sql.push_str(" WHERE status = ?");
            params.push(Box::new(status.clone()));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
        params.push(Box::new(filter.limit));
        params.push(Box::new(filter.offset));

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_ticket)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let mut tickets = Vec::new();
        for row_result in rows {
            tickets.push(row_result.map_err(|e| TicketError::Database(e.to_string()))?);
        }

        Ok(tickets)
    }

    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError> {
        let conn = self.conn.lock().unwrap();

        let result = match filter.status {
            Some(ref status) => conn.query_row(
                "SELECT COUNT(*) FROM tickets WHERE status = ?",
                params![status],
                |row| row.get(0),
            ),
            None => conn.query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0)),
        };

        result.map_err(|e| TicketError::Database(e.to_string()))
    }

    fn set_issue_type(&self, id: i64, issue_type: &str) -> Result<Ticket, TicketError> {
        self.update_ticket(id, |ticket| {
            ticket.issue_type = Some(issue_type.to_string());
            ticket.status = ticket.status.advanced_to(TicketStatus::Classified);
        })
    }

    fn set_tracker_key(&self, id: i64, key: &str) -> Result<Ticket, TicketError> {
        self.update_ticket(id, |ticket| {
            ticket.tracker_issue_key = Some(key.to_string());
            ticket.status = ticket.status.advanced_to(TicketStatus::IssueOpened);
        })
    }

    fn mark_notified(&self, id: i64) -> Result<Ticket, TicketError> {
        self.update_ticket(id, |ticket| {
            ticket.notification_sent = true;
            ticket.status = ticket.status.advanced_to(TicketStatus::Notified);
        })
    }

    fn set_email_draft(&self, id: i64, draft: &str) -> Result<Ticket, TicketError> {
        self.update_ticket(id, |ticket| {
            ticket.email_draft = Some(draft.to_string());
            ticket.status = ticket.status.advanced_to(TicketStatus::Drafted);
        })
    }

    fn mark_email_sent(&self, id: i64) -> Result<Ticket, TicketError> {
        self.update_ticket(id, |ticket| {
            ticket.email_sent = true;
            ticket.status = ticket.status.advanced_to(TicketStatus::Sent);
        })
    }
}
