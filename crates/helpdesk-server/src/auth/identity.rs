//! Identity bound to a request by the access gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use helpdesk_core::{Error, Result, Role};
use tracing::warn;

use super::claims::Claims;
use crate::server::error::ApiError;

/// Caller identity taken from a validated access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestIdentity {
    pub id: i64,
    pub role: Role,
}

impl RequestIdentity {
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Role gate for admin-only operations.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!(user_id = self.id, "Admin role required");
            Err(Error::PermissionDenied)
        }
    }
}

impl From<&Claims> for RequestIdentity {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.user_id,
            role: claims.role,
        }
    }
}

/// Handlers behind the access gate take the identity as an argument.
impl<S: Send + Sync> FromRequestParts<S> for RequestIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or(ApiError(Error::NotAuthenticated))
    }
}
