//! User queries for Helpdesk server.

use helpdesk_core::user::{NewUser, User};

use super::db::{DatabaseError, HelpdeskDatabase};
use super::models::UserRow;

impl HelpdeskDatabase {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Insert a new user. A taken e-mail surfaces as `DatabaseError::Conflict`.
    pub async fn insert_user(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO users (user_role, email, login, encrypted_password, api_token, \
             contacts, is_active, registration_date) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.role.as_str())
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.encrypted_password)
        .bind(&user.token)
        .bind(&user.contacts)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(self.pool())
        .await?;

        self.get_user(result.last_insert_rowid()).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {id}")))?
            .try_into()
    }

    /// Get a user by e-mail.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User with email {email}")))?
            .try_into()
    }

    /// Overwrite every mutable column of an existing user.
    pub async fn save_user(&self, user: &User) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET user_role = ?, email = ?, login = ?, encrypted_password = ?, \
             api_token = ?, contacts = ?, is_active = ? WHERE id = ?",
        )
        .bind(user.role.as_str())
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.encrypted_password)
        .bind(&user.token)
        .bind(&user.contacts)
        .bind(user.is_active)
        .bind(user.id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("User {}", user.id)));
        }
        Ok(())
    }
}
