//! Error types for `Helpdesk` core library.

use thiserror::Error;

use crate::db::DatabaseError;

/// Result type alias using `Helpdesk` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `Helpdesk` operations.
///
/// Token parse failures and token-kind mismatches both collapse into
/// [`Error::NotAuthenticated`] so callers cannot tell which check failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing, malformed, expired or wrong-kind token, or bad credentials.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Role gate failure.
    #[error("Permission denied")]
    PermissionDenied,

    /// Ticket status outside the known set.
    #[error("Processing status not found: {0}")]
    InvalidStatus(String),

    /// Notification status outside the known set.
    #[error("Status not found: {0}")]
    UnknownStatus(String),

    /// Repository miss.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Malformed or empty request fields.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unique constraint violation (e.g. e-mail already registered).
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The request deadline elapsed before the operation finished.
    #[error("Request timed out")]
    Timeout,

    /// Signing or storage fault.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DatabaseError> for Error {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            DatabaseError::Conflict(what) => Self::AlreadyExists(what),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_not_found_maps_to_not_found() {
        let err: Error = DatabaseError::NotFound("Ticket 7".into()).into();
        assert!(matches!(err, Error::NotFound(ref what) if what == "Ticket 7"));
    }

    #[test]
    fn database_query_error_is_internal() {
        let err: Error = DatabaseError::Query("disk I/O error".into()).into();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn database_conflict_maps_to_already_exists() {
        let err: Error = DatabaseError::Conflict("email".into()).into();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }
}
