//! Ticket and ticket message queries.

use helpdesk_core::ticket::{NewTicket, NewTicketMessage, Ticket, TicketMessage, TicketStatus};

use super::db::{DatabaseError, HelpdeskDatabase};
use super::models::{TicketMessageRow, TicketRow};

impl HelpdeskDatabase {
    // =========================================================================
    // Ticket queries
    // =========================================================================

    pub async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO tickets (title, description, section, from_user, helper, created_at, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(&ticket.section)
        .bind(ticket.from)
        .bind(ticket.helper)
        .bind(ticket.created_at)
        .bind(ticket.status.as_str())
        .execute(self.pool())
        .await?;

        self.get_ticket(result.last_insert_rowid()).await
    }

    pub async fn get_ticket(&self, id: i64) -> Result<Ticket, DatabaseError> {
        sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Ticket {id}")))?
            .try_into()
    }

    /// Tickets raised by `owner_id`, oldest first.
    pub async fn list_tickets_for_owner(&self, owner_id: i64) -> Result<Vec<Ticket>, DatabaseError> {
        sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE from_user = ? ORDER BY id")
            .bind(owner_id)
            .fetch_all(self.pool())
            .await?
            .into_iter()
            .map(Ticket::try_from)
            .collect()
    }

    /// Set helper and status together.
    pub async fn assign_ticket(
        &self,
        id: i64,
        helper_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket, DatabaseError> {
        let result = sqlx::query("UPDATE tickets SET helper = ?, status = ? WHERE id = ?")
            .bind(helper_id)
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Ticket {id}")));
        }
        self.get_ticket(id).await
    }

    pub async fn set_ticket_status(
        &self,
        id: i64,
        status: TicketStatus,
    ) -> Result<Ticket, DatabaseError> {
        let result = sqlx::query("UPDATE tickets SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Ticket {id}")));
        }
        self.get_ticket(id).await
    }

    // =========================================================================
    // Ticket message queries
    // =========================================================================

    pub async fn insert_ticket_message(
        &self,
        message: &NewTicketMessage,
    ) -> Result<TicketMessage, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO ticket_messages (who, ticket_id, message, date) VALUES (?, ?, ?, ?)",
        )
        .bind(message.who)
        .bind(message.ticket_id)
        .bind(&message.message)
        .bind(message.date)
        .execute(self.pool())
        .await?;

        Ok(message.clone().into_message(result.last_insert_rowid()))
    }

    /// Messages of a ticket, oldest first.
    pub async fn list_ticket_messages(
        &self,
        ticket_id: i64,
    ) -> Result<Vec<TicketMessage>, DatabaseError> {
        let rows = sqlx::query_as::<_, TicketMessageRow>(
            "SELECT * FROM ticket_messages WHERE ticket_id = ? ORDER BY id",
        )
        .bind(ticket_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(TicketMessage::from).collect())
    }
}
