//! Identities: registration, validation and field-by-field patching.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on accepted plaintext password length.
pub const MAX_PASSWORD_LEN: usize = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
});

/// Access level carried by an identity and by its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(Error::InvalidInput(format!("unknown role {other:?}"))),
        }
    }
}

/// A persisted identity. Exactly one per e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "user_role")]
    pub role: Role,
    pub email: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    #[serde(rename = "api_token")]
    pub token: String,
    pub contacts: String,
    #[serde(skip_serializing)]
    pub is_active: bool,
    #[serde(rename = "registration_date")]
    pub created_at: i64,
}

impl User {
    /// Check the invariants every stored identity must satisfy.
    pub fn validate(&self) -> Result<()> {
        validate_login(&self.login)?;
        validate_email(&self.email)?;
        if self.encrypted_password.is_empty() {
            return Err(Error::InvalidInput("password is required".into()));
        }
        Ok(())
    }
}

/// An identity that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub role: Role,
    pub email: String,
    pub login: String,
    pub encrypted_password: String,
    pub token: String,
    pub contacts: String,
    pub is_active: bool,
    pub created_at: i64,
}

impl NewUser {
    /// Build a registration record. Role is always `USER` and the identity
    /// starts active, whatever the caller asked for.
    pub fn register(
        registration: Registration,
        encrypted_password: String,
        token: String,
        now: i64,
    ) -> Self {
        Self {
            role: Role::User,
            email: registration.email,
            login: registration.login,
            encrypted_password,
            token,
            contacts: String::new(),
            is_active: true,
            created_at: now,
        }
    }

    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            role: self.role,
            email: self.email,
            login: self.login,
            encrypted_password: self.encrypted_password,
            token: self.token,
            contacts: self.contacts,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// Sign-up request fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    #[serde(alias = "username")]
    pub login: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn validate(&self, min_password_len: usize) -> Result<()> {
        validate_login(&self.login)?;
        validate_email(&self.email)?;
        validate_password(&self.password, min_password_len)
    }
}

/// Partial update of an identity.
///
/// Each field is applied only when present; a present empty `contacts`
/// clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    /// Target identity. Only admins may name someone other than themselves.
    pub user_id: Option<i64>,
    pub login: Option<String>,
    pub email: Option<String>,
    pub contacts: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "user_role")]
    pub role: Option<Role>,
    #[serde(alias = "api_token")]
    pub token: Option<String>,
}

impl UserPatch {
    /// Decide whose record this patch may touch. Returns the target id.
    ///
    /// The API token is never client-writable, and only admins may change
    /// roles or edit other identities.
    pub fn authorize(&self, actor_id: i64, actor_role: Role) -> Result<i64> {
        if self.token.is_some() {
            return Err(Error::PermissionDenied);
        }
        let is_admin = actor_role == Role::Admin;
        if self.role.is_some() && !is_admin {
            return Err(Error::PermissionDenied);
        }
        match self.user_id {
            Some(target) if target != actor_id && !is_admin => Err(Error::PermissionDenied),
            Some(target) => Ok(target),
            None => Ok(actor_id),
        }
    }

    /// Apply present fields to `user`, hashing a new password with `hash`,
    /// then re-validate the result.
    pub fn apply_to(
        self,
        user: &mut User,
        min_password_len: usize,
        hash: impl FnOnce(&str) -> Result<String>,
    ) -> Result<()> {
        if let Some(login) = self.login {
            user.login = login;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(contacts) = self.contacts {
            user.contacts = contacts;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(password) = self.password {
            validate_password(&password, min_password_len)?;
            user.encrypted_password = hash(&password)?;
        }
        user.validate()
    }
}

fn validate_login(login: &str) -> Result<()> {
    if login.trim().is_empty() {
        return Err(Error::InvalidInput("login is required".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(Error::InvalidInput("email is required".into()));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(Error::InvalidInput("email is not valid".into()));
    }
    Ok(())
}

fn validate_password(password: &str, min_len: usize) -> Result<()> {
    let len = password.chars().count();
    if len < min_len || len > MAX_PASSWORD_LEN {
        return Err(Error::InvalidInput(format!(
            "password must be between {min_len} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
