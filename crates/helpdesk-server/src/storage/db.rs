//! `SQLite` database for Helpdesk server.

pub use helpdesk_core::db::DatabaseError;

helpdesk_core::define_database!(HelpdeskDatabase, "Helpdesk database migrations complete");
