//! Helpdesk Server Library
//!
//! Core functionality for the Helpdesk backend:
//! - `SQLite` storage for users, tickets, messages and notifications
//! - JWT access/refresh tokens and password hashing
//! - HTTP API (axum) with the access gate and role checks
//! - Outbound chat notifications

pub mod auth;
pub mod notifier;
pub mod server;
pub mod storage;
