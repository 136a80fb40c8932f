//! `SQLite` storage for Helpdesk server.
//!
//! Provides persistence for users, tickets, ticket messages and notifications,
//! and implements the repository traits on top of it.

mod db;
mod models;
mod queries;
mod queries_notifications;
mod queries_tickets;
mod repositories;

#[cfg(test)]
mod tests;

pub use db::{DatabaseError, HelpdeskDatabase};
pub use models::*;
