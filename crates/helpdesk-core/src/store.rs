//! Repository interfaces over durable storage.
//!
//! Each service depends only on the trait it needs. The server implements all
//! three on its `SQLite` database; [`crate::memory::MemoryStore`] implements
//! them in memory for tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::notification::{NewNotification, Notification};
use crate::ticket::{NewTicket, NewTicketMessage, Ticket, TicketMessage, TicketStatus};
use crate::user::{NewUser, User};

/// Identity storage used by the account endpoints.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store a new identity. Fails with `AlreadyExists` when the e-mail is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user_by_email(&self, email: &str) -> Result<User>;

    async fn find_user(&self, id: i64) -> Result<User>;

    /// Overwrite every mutable field of an existing identity.
    async fn update_user(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket>;

    /// Record `helper_id` and set `status` in one step.
    async fn accept_ticket(
        &self,
        ticket_id: i64,
        helper_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket>;

    async fn find_ticket(&self, ticket_id: i64) -> Result<Ticket>;

    /// Tickets owned by `owner_id`, oldest first.
    async fn find_tickets_by_owner(&self, owner_id: i64) -> Result<Vec<Ticket>>;

    async fn change_ticket_status(&self, ticket_id: i64, status: TicketStatus) -> Result<Ticket>;

    async fn add_message(&self, message: NewTicketMessage) -> Result<TicketMessage>;

    /// Messages attached to `ticket_id`, oldest first.
    async fn take_messages(&self, ticket_id: i64) -> Result<Vec<TicketMessage>>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;

    /// Unchecked notifications addressed to `user_id`.
    async fn find_unread_for(&self, user_id: i64) -> Result<Vec<Notification>>;

    /// Mark the given notifications checked, touching only those addressed to
    /// `user_id`. Returns how many were updated.
    async fn check_notifications(&self, ids: &[i64], user_id: i64) -> Result<u64>;
}
