//! Support tickets and their processing state machine.
//!
//! ```text
//! opened --accept / change_status--> in_process --change_status--> closed
//!    ^                                                               |
//!    +---------------------- change_status --------------------------+
//! ```
//!
//! Any known status may be set explicitly, closed tickets included.
//! Acceptance always lands in `in_process` and records the helper.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::db::unix_timestamp;
use crate::error::{Error, Result};
use crate::store::TicketRepository;

/// Helper id of a ticket nobody has accepted yet.
pub const NO_HELPER: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Opened,
    #[serde(alias = "in process")]
    InProcess,
    Closed,
}

impl TicketStatus {
    pub const ALL: [Self; 3] = [Self::Opened, Self::InProcess, Self::Closed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::InProcess => "in_process",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Older clients spell the middle state with a space.
        let wanted = if s == "in process" { "in_process" } else { s };
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub section: String,
    /// Owner identity id.
    pub from: i64,
    /// Accepting identity id, or [`NO_HELPER`].
    pub helper: i64,
    pub created_at: i64,
    pub status: TicketStatus,
}

/// Fields a ticket owner supplies.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub section: String,
}

impl TicketDraft {
    pub fn validate(&self) -> Result<()> {
        if self.title.is_empty() || self.description.is_empty() || self.section.is_empty() {
            return Err(Error::InvalidInput(
                "title, description and section are required".into(),
            ));
        }
        Ok(())
    }
}

/// A ticket ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub section: String,
    pub from: i64,
    pub helper: i64,
    pub created_at: i64,
    pub status: TicketStatus,
}

impl NewTicket {
    /// Every ticket starts opened and unassigned.
    pub fn open(draft: TicketDraft, owner_id: i64, now: i64) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            section: draft.section,
            from: owner_id,
            helper: NO_HELPER,
            created_at: now,
            status: TicketStatus::Opened,
        }
    }

    pub fn into_ticket(self, id: i64) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            section: self.section,
            from: self.from,
            helper: self.helper,
            created_at: self.created_at,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketMessage {
    pub id: i64,
    pub who: i64,
    pub ticket_id: i64,
    pub message: String,
    pub date: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicketMessage {
    pub who: i64,
    pub ticket_id: i64,
    pub message: String,
    pub date: i64,
}

impl NewTicketMessage {
    pub fn into_message(self, id: i64) -> TicketMessage {
        TicketMessage {
            id,
            who: self.who,
            ticket_id: self.ticket_id,
            message: self.message,
            date: self.date,
        }
    }
}

/// Drives ticket creation, acceptance and status changes over a
/// [`TicketRepository`].
#[derive(Clone)]
pub struct TicketManager {
    repo: Arc<dyn TicketRepository>,
}

impl TicketManager {
    pub fn new(repo: Arc<dyn TicketRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, owner_id: i64, draft: TicketDraft) -> Result<Ticket> {
        draft.validate()?;
        let ticket = self
            .repo
            .create_ticket(NewTicket::open(draft, owner_id, unix_timestamp()))
            .await?;
        info!(ticket_id = ticket.id, owner_id, "Ticket opened");
        Ok(ticket)
    }

    /// Assign `helper_id` and move the ticket to `in_process`.
    #[instrument(skip(self))]
    pub async fn accept(&self, ticket_id: i64, helper_id: i64) -> Result<Ticket> {
        let ticket = self
            .repo
            .accept_ticket(ticket_id, helper_id, TicketStatus::InProcess)
            .await?;
        info!(ticket_id, helper_id, "Ticket accepted");
        Ok(ticket)
    }

    /// Set an explicit status. The status is parsed before the repository is
    /// touched, so an unknown value never changes the stored ticket.
    #[instrument(skip(self))]
    pub async fn change_status(&self, ticket_id: i64, new_status: &str) -> Result<Ticket> {
        let status: TicketStatus = new_status.parse()?;
        let ticket = self.repo.change_ticket_status(ticket_id, status).await?;
        info!(ticket_id, status = %status, "Ticket status changed");
        Ok(ticket)
    }

    /// Append a message. The referenced ticket is not checked for existence.
    #[instrument(skip(self, text))]
    pub async fn add_message(&self, who: i64, ticket_id: i64, text: String) -> Result<TicketMessage> {
        if text.is_empty() || ticket_id == 0 {
            return Err(Error::InvalidInput("message and ticket_id are required".into()));
        }
        self.repo
            .add_message(NewTicketMessage {
                who,
                ticket_id,
                message: text,
                date: unix_timestamp(),
            })
            .await
    }

    pub async fn find(&self, ticket_id: i64) -> Result<Ticket> {
        self.repo.find_ticket(ticket_id).await
    }

    pub async fn find_all(&self, owner_id: i64) -> Result<Vec<Ticket>> {
        self.repo.find_tickets_by_owner(owner_id).await
    }

    pub async fn take_messages(&self, ticket_id: i64) -> Result<Vec<TicketMessage>> {
        self.repo.take_messages(ticket_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn manager() -> TicketManager {
        TicketManager::new(Arc::new(MemoryStore::new()))
    }

    fn draft() -> TicketDraft {
        TicketDraft {
            title: "Printer".into(),
            description: "Paper jam on floor 2".into(),
            section: "hardware".into(),
        }
    }

    #[test]
    fn status_parsing_is_set_membership() {
        for status in TicketStatus::ALL {
            assert_eq!(status.as_str().parse::<TicketStatus>().unwrap(), status);
        }
        assert_eq!(
            "in process".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProcess
        );
        for bad in ["", "OPENED", "open", "closed ", "resolved"] {
            assert!(
                matches!(bad.parse::<TicketStatus>(), Err(Error::InvalidStatus(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TicketStatus::InProcess).unwrap(),
            "in_process"
        );
    }

    #[tokio::test]
    async fn create_opens_unassigned_ticket() {
        let tickets = manager();
        let ticket = tickets.create(33, draft()).await.unwrap();

        assert_eq!(ticket.status, TicketStatus::Opened);
        assert_eq!(ticket.helper, NO_HELPER);
        assert_eq!(ticket.from, 33);
        assert!(ticket.created_at > 0);
    }

    #[tokio::test]
    async fn create_requires_all_fields() {
        let tickets = manager();
        let err = tickets
            .create(
                33,
                TicketDraft {
                    section: String::new(),
                    ..draft()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn accept_assigns_helper_and_moves_in_process() {
        let tickets = manager();
        let ticket = tickets.create(33, draft()).await.unwrap();

        let accepted = tickets.accept(ticket.id, 7).await.unwrap();
        assert_eq!(accepted.helper, 7);
        assert_eq!(accepted.status, TicketStatus::InProcess);

        let stored = tickets.find(ticket.id).await.unwrap();
        assert_eq!(stored, accepted);
    }

    #[tokio::test]
    async fn accept_unknown_ticket_is_not_found() {
        let tickets = manager();
        assert!(matches!(
            tickets.accept(404, 7).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn invalid_status_leaves_ticket_unchanged() {
        let tickets = manager();
        let ticket = tickets.create(33, draft()).await.unwrap();

        let err = tickets.change_status(ticket.id, "done").await.unwrap_err();
        assert!(matches!(err, Error::InvalidStatus(_)));

        let stored = tickets.find(ticket.id).await.unwrap();
        assert_eq!(stored.status, TicketStatus::Opened);
    }

    #[tokio::test]
    async fn closed_ticket_can_be_reopened() {
        let tickets = manager();
        let ticket = tickets.create(33, draft()).await.unwrap();

        tickets.change_status(ticket.id, "closed").await.unwrap();
        let reopened = tickets.change_status(ticket.id, "opened").await.unwrap();
        assert_eq!(reopened.status, TicketStatus::Opened);
    }

    #[tokio::test]
    async fn change_status_unknown_ticket_is_not_found() {
        let tickets = manager();
        assert!(matches!(
            tickets.change_status(404, "closed").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn messages_are_accepted_without_a_ticket() {
        let tickets = manager();
        let msg = tickets.add_message(43, 999, "hello".into()).await.unwrap();
        assert_eq!(msg.ticket_id, 999);
        assert!(msg.date > 0);

        let messages = tickets.take_messages(999).await.unwrap();
        assert_eq!(messages, vec![msg]);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let tickets = manager();
        assert!(matches!(
            tickets.add_message(43, 1, String::new()).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn find_all_returns_only_owned_tickets() {
        let tickets = manager();
        let first = tickets.create(1, draft()).await.unwrap();
        tickets.create(2, draft()).await.unwrap();
        let second = tickets.create(1, draft()).await.unwrap();

        let owned = tickets.find_all(1).await.unwrap();
        assert_eq!(owned, vec![first, second]);
    }
}
