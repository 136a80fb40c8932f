//! JWT token issuance and validation.

use helpdesk_core::db::unix_timestamp;
use helpdesk_core::{Error, Result, Role};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use tracing::debug;

use super::claims::{Claims, TokenKind};

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// An access/refresh token pair as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies HS512 tokens with a secret fixed at construction.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_days: i64,
    refresh_ttl_days: i64,
}

impl TokenService {
    /// Create a new `TokenService` with the given secret and lifetimes.
    pub fn new(secret: &[u8], access_ttl_days: i64, refresh_ttl_days: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl_days,
            refresh_ttl_days,
        }
    }

    /// Sign a token of `kind` for the identity, valid for `lifetime_days`.
    pub fn issue(
        &self,
        user_id: i64,
        role: Role,
        lifetime_days: i64,
        kind: TokenKind,
    ) -> Result<String> {
        let now = unix_timestamp();
        let exp = lifetime_days
            .checked_mul(SECS_PER_DAY)
            .and_then(|lifetime| now.checked_add(lifetime))
            .ok_or_else(|| {
                Error::Internal(format!("Token lifetime of {lifetime_days} days is out of range"))
            })?;
        let claims = Claims {
            jti: uuid::Uuid::new_v4().to_string(),
            user_id,
            role,
            token_kind: kind,
            iat: now,
            exp,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("Token creation failed: {e}")))
    }

    /// Issue a fresh access token and refresh token for the identity.
    pub fn issue_pair(&self, user_id: i64, role: Role) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(user_id, role, self.access_ttl_days, TokenKind::Access)?,
            refresh_token: self.issue(user_id, role, self.refresh_ttl_days, TokenKind::Refresh)?,
        })
    }

    /// Verify signature, structure and expiry. Does not look at the kind.
    pub fn parse(&self, token: &str) -> Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                Error::NotAuthenticated
            })
    }

    /// Access gate: the token must parse and be an access token.
    pub fn authenticate_access(&self, token: &str) -> Result<Claims> {
        let claims = self.parse(token)?;
        if !claims.is_access() {
            debug!(user_id = claims.user_id, "Refresh token used at access gate");
            return Err(Error::NotAuthenticated);
        }
        Ok(claims)
    }

    /// Refresh gate: mint a new access token for the identity in a valid
    /// refresh token. The refresh token itself is handed back unchanged.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.parse(refresh_token)?;
        if !claims.is_refresh() {
            debug!(user_id = claims.user_id, "Access token used at refresh gate");
            return Err(Error::NotAuthenticated);
        }
        Ok(TokenPair {
            access_token: self.issue(
                claims.user_id,
                claims.role,
                self.access_ttl_days,
                TokenKind::Access,
            )?,
            refresh_token: refresh_token.to_string(),
        })
    }
}
