//! In-memory repositories.
//!
//! Same observable behavior as the `SQLite` store, without a database. Used by
//! unit tests and by the server's handler tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::notification::{NewNotification, Notification};
use crate::store::{CredentialStore, NotificationRepository, TicketRepository};
use crate::ticket::{NewTicket, NewTicketMessage, Ticket, TicketMessage, TicketStatus};
use crate::user::{NewUser, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tickets: BTreeMap<i64, Ticket>,
    messages: BTreeMap<i64, TicketMessage>,
    notifications: BTreeMap<i64, Notification>,
    last_id: i64,
}

impl Tables {
    const fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn ticket_mut(&mut self, ticket_id: i64) -> Result<&mut Ticket> {
        self.tickets
            .get_mut(&ticket_id)
            .ok_or_else(|| Error::NotFound(format!("Ticket {ticket_id}")))
    }
}

/// Repositories backed by ordered maps behind a single lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(Error::AlreadyExists(format!("User {}", user.email)));
        }
        let id = tables.next_id();
        let user = user.into_user(id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {email}")))
    }

    async fn find_user(&self, id: i64) -> Result<User> {
        self.tables
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {id}")))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(Error::AlreadyExists(format!("User {}", user.email)));
        }
        let slot = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| Error::NotFound(format!("User {}", user.id)))?;
        *slot = user.clone();
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let ticket = ticket.into_ticket(id);
        tables.tickets.insert(id, ticket.clone());
        Ok(ticket)
    }

    async fn accept_ticket(
        &self,
        ticket_id: i64,
        helper_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket> {
        let mut tables = self.tables.write().await;
        let ticket = tables.ticket_mut(ticket_id)?;
        ticket.helper = helper_id;
        ticket.status = status;
        Ok(ticket.clone())
    }

    async fn find_ticket(&self, ticket_id: i64) -> Result<Ticket> {
        self.tables
            .read()
            .await
            .tickets
            .get(&ticket_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Ticket {ticket_id}")))
    }

    async fn find_tickets_by_owner(&self, owner_id: i64) -> Result<Vec<Ticket>> {
        Ok(self
            .tables
            .read()
            .await
            .tickets
            .values()
            .filter(|t| t.from == owner_id)
            .cloned()
            .collect())
    }

    async fn change_ticket_status(&self, ticket_id: i64, status: TicketStatus) -> Result<Ticket> {
        let mut tables = self.tables.write().await;
        let ticket = tables.ticket_mut(ticket_id)?;
        ticket.status = status;
        Ok(ticket.clone())
    }

    async fn add_message(&self, message: NewTicketMessage) -> Result<TicketMessage> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let message = message.into_message(id);
        tables.messages.insert(id, message.clone());
        Ok(message)
    }

    async fn take_messages(&self, ticket_id: i64) -> Result<Vec<TicketMessage>> {
        Ok(self
            .tables
            .read()
            .await
            .messages
            .values()
            .filter(|m| m.ticket_id == ticket_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let notification = notification.into_notification(id);
        tables.notifications.insert(id, notification.clone());
        Ok(notification)
    }

    async fn find_unread_for(&self, user_id: i64) -> Result<Vec<Notification>> {
        Ok(self
            .tables
            .read()
            .await
            .notifications
            .values()
            .filter(|n| n.for_user == user_id && !n.checked)
            .cloned()
            .collect())
    }

    async fn check_notifications(&self, ids: &[i64], user_id: i64) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let mut updated = 0;
        for id in ids {
            if let Some(n) = tables.notifications.get_mut(id) {
                if n.for_user == user_id && !n.checked {
                    n.checked = true;
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::user::{Registration, Role};

    fn new_user(email: &str) -> NewUser {
        NewUser::register(
            Registration {
                login: "someone".into(),
                email: email.into(),
                password: "123456".into(),
            },
            "hash".into(),
            "api".into(),
            1,
        )
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@x.com")).await.unwrap();
        let err = store.create_user(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn update_replaces_stored_user() {
        let store = MemoryStore::new();
        let mut user = store.create_user(new_user("a@x.com")).await.unwrap();
        user.role = Role::Admin;
        user.contacts = "room 12".into();
        store.update_user(&user).await.unwrap();

        let stored = store.find_user_by_email("a@x.com").await.unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn update_cannot_steal_an_email() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@x.com")).await.unwrap();
        let mut other = store.create_user(new_user("b@x.com")).await.unwrap();
        other.email = "a@x.com".into();
        assert!(matches!(
            store.update_user(&other).await,
            Err(Error::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.find_user(9).await, Err(Error::NotFound(_))));
        assert!(matches!(
            store.find_user_by_email("nobody@x.com").await,
            Err(Error::NotFound(_))
        ));
    }
}
