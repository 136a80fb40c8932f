//! Repository trait implementations over [`HelpdeskDatabase`].

use async_trait::async_trait;
use helpdesk_core::Result;
use helpdesk_core::notification::{NewNotification, Notification};
use helpdesk_core::store::{CredentialStore, NotificationRepository, TicketRepository};
use helpdesk_core::ticket::{NewTicket, NewTicketMessage, Ticket, TicketMessage, TicketStatus};
use helpdesk_core::user::{NewUser, User};

use super::db::HelpdeskDatabase;

#[async_trait]
impl CredentialStore for HelpdeskDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        Ok(self.insert_user(&user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User> {
        Ok(self.get_user_by_email(email).await?)
    }

    async fn find_user(&self, id: i64) -> Result<User> {
        Ok(self.get_user(id).await?)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        Ok(self.save_user(user).await?)
    }
}

#[async_trait]
impl TicketRepository for HelpdeskDatabase {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket> {
        Ok(self.insert_ticket(&ticket).await?)
    }

    async fn accept_ticket(
        &self,
        ticket_id: i64,
        helper_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket> {
        Ok(self.assign_ticket(ticket_id, helper_id, status).await?)
    }

    async fn find_ticket(&self, ticket_id: i64) -> Result<Ticket> {
        Ok(self.get_ticket(ticket_id).await?)
    }

    async fn find_tickets_by_owner(&self, owner_id: i64) -> Result<Vec<Ticket>> {
        Ok(self.list_tickets_for_owner(owner_id).await?)
    }

    async fn change_ticket_status(&self, ticket_id: i64, status: TicketStatus) -> Result<Ticket> {
        Ok(self.set_ticket_status(ticket_id, status).await?)
    }

    async fn add_message(&self, message: NewTicketMessage) -> Result<TicketMessage> {
        Ok(self.insert_ticket_message(&message).await?)
    }

    async fn take_messages(&self, ticket_id: i64) -> Result<Vec<TicketMessage>> {
        Ok(self.list_ticket_messages(ticket_id).await?)
    }
}

#[async_trait]
impl NotificationRepository for HelpdeskDatabase {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        Ok(self.insert_notification(&notification).await?)
    }

    async fn find_unread_for(&self, user_id: i64) -> Result<Vec<Notification>> {
        Ok(self.list_unread_notifications(user_id).await?)
    }

    async fn check_notifications(&self, ids: &[i64], user_id: i64) -> Result<u64> {
        Ok(self.mark_notifications_checked(ids, user_id).await?)
    }
}
