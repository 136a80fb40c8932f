//! `Helpdesk` Core Library
//!
//! Transport-independent functionality shared by Helpdesk components:
//! - Identity, ticket and notification models
//! - Ticket lifecycle and notification tracking
//! - Repository traits and an in-memory implementation
//! - Configuration resolution and hierarchy
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod notification;
pub mod store;
pub mod ticket;
pub mod tracing_init;
pub mod user;

pub use config::Config;
pub use error::{Error, Result};
pub use notification::{Notification, NotificationStatus, NotificationTracker};
pub use store::{CredentialStore, NotificationRepository, TicketRepository};
pub use ticket::{Ticket, TicketManager, TicketMessage, TicketStatus};
pub use user::{Role, User, UserPatch};
