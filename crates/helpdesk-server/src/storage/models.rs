//! Row types for Helpdesk storage and their conversion into domain types.

use helpdesk_core::notification::{Notification, NotificationStatus};
use helpdesk_core::ticket::{Ticket, TicketMessage, TicketStatus};
use helpdesk_core::user::{Role, User};

use super::db::DatabaseError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub user_role: String,
    pub email: String,
    pub login: String,
    pub encrypted_password: String,
    pub api_token: String,
    pub contacts: String,
    pub is_active: bool,
    pub registration_date: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub section: String,
    pub from_user: i64,
    pub helper: i64,
    pub created_at: i64,
    pub status: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketMessageRow {
    pub id: i64,
    pub who: i64,
    pub ticket_id: i64,
    pub message: String,
    pub date: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: i64,
    pub message: String,
    pub date: i64,
    pub status: String,
    pub for_user: i64,
    pub checked: bool,
}

fn corrupt(what: &str, value: &str) -> DatabaseError {
    DatabaseError::Query(format!("stored {what} {value:?} is not recognised"))
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .user_role
            .parse()
            .map_err(|_| corrupt("role", &row.user_role))?;
        Ok(Self {
            id: row.id,
            role,
            email: row.email,
            login: row.login,
            encrypted_password: row.encrypted_password,
            token: row.api_token,
            contacts: row.contacts,
            is_active: row.is_active,
            created_at: row.registration_date,
        })
    }
}

impl TryFrom<TicketRow> for Ticket {
    type Error = DatabaseError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status: TicketStatus = row
            .status
            .parse()
            .map_err(|_| corrupt("ticket status", &row.status))?;
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            section: row.section,
            from: row.from_user,
            helper: row.helper,
            created_at: row.created_at,
            status,
        })
    }
}

impl From<TicketMessageRow> for TicketMessage {
    fn from(row: TicketMessageRow) -> Self {
        Self {
            id: row.id,
            who: row.who,
            ticket_id: row.ticket_id,
            message: row.message,
            date: row.date,
        }
    }
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DatabaseError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let status: NotificationStatus = row
            .status
            .parse()
            .map_err(|_| corrupt("notification status", &row.status))?;
        Ok(Self {
            id: row.id,
            message: row.message,
            date: row.date,
            status,
            for_user: row.for_user,
            checked: row.checked,
        })
    }
}
