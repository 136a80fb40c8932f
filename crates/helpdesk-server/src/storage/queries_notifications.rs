//! Notification queries.

use std::collections::BTreeSet;

use helpdesk_core::notification::{NewNotification, Notification};
use sqlx::{QueryBuilder, Sqlite};

use super::db::{DatabaseError, HelpdeskDatabase};
use super::models::NotificationRow;

/// Ids bound per `UPDATE` when checking notifications.
const CHECK_CHUNK_SIZE: usize = 500;

impl HelpdeskDatabase {
    // =========================================================================
    // Notification queries
    // =========================================================================

    pub async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO notifications (message, date, status, for_user, checked) \
             VALUES (?, ?, ?, ?, 0)",
        )
        .bind(&notification.message)
        .bind(notification.date)
        .bind(notification.status.as_str())
        .bind(notification.for_user)
        .execute(self.pool())
        .await?;

        Ok(notification
            .clone()
            .into_notification(result.last_insert_rowid()))
    }

    /// Unchecked notifications addressed to `user_id`, oldest first.
    pub async fn list_unread_notifications(
        &self,
        user_id: i64,
    ) -> Result<Vec<Notification>, DatabaseError> {
        sqlx::query_as::<_, NotificationRow>(
            "SELECT * FROM notifications WHERE for_user = ? AND checked = 0 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(Notification::try_from)
        .collect()
    }

    /// Mark notifications checked. Only rows addressed to `user_id` that are
    /// still unchecked are touched; returns how many changed.
    ///
    /// Ids are deduplicated and bound in chunks of [`CHECK_CHUNK_SIZE`] inside
    /// one transaction, so any number of ids stays under the `SQLite`
    /// variable limit.
    pub async fn mark_notifications_checked(
        &self,
        ids: &[i64],
        user_id: i64,
    ) -> Result<u64, DatabaseError> {
        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i64> = ids.into_iter().collect();

        let mut tx = self.pool().begin().await?;
        let mut updated = 0;
        for chunk in ids.chunks(CHECK_CHUNK_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(
                "UPDATE notifications SET checked = 1 WHERE checked = 0 AND for_user = ",
            );
            query.push_bind(user_id).push(" AND id IN (");
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            updated += query.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }
}
