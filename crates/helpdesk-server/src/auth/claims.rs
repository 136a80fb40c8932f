//! JWT claims structure for Helpdesk auth.

use helpdesk_core::Role;
use serde::{Deserialize, Serialize};

/// Which gate a token is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID (unique per token).
    pub jti: String,
    /// Identity id.
    pub user_id: i64,
    pub role: Role,
    pub token_kind: TokenKind,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub const fn is_access(&self) -> bool {
        matches!(self.token_kind, TokenKind::Access)
    }

    pub const fn is_refresh(&self) -> bool {
        matches!(self.token_kind, TokenKind::Refresh)
    }
}
