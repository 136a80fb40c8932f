//! Authentication module for Helpdesk server.
//!
//! Provides JWT token management, password hashing and the request identity
//! bound by the access gate.

pub mod claims;
pub mod identity;
pub mod jwt;
pub mod password;

pub use claims::{Claims, TokenKind};
pub use identity::RequestIdentity;
pub use jwt::{TokenPair, TokenService};
