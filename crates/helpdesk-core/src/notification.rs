//! Per-identity notifications and their unread/checked state.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::db::unix_timestamp;
use crate::error::{Error, Result};
use crate::store::NotificationRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Info,
    Warning,
    Error,
}

impl NotificationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

/// A stored notification. Only `checked` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub date: i64,
    pub status: NotificationStatus,
    #[serde(rename = "for")]
    pub for_user: i64,
    pub checked: bool,
}

/// What an administrator submits. `status` stays a string until validated.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationDraft {
    pub message: String,
    pub status: String,
    #[serde(rename = "for")]
    pub for_user: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub message: String,
    pub date: i64,
    pub status: NotificationStatus,
    pub for_user: i64,
}

impl NewNotification {
    pub fn into_notification(self, id: i64) -> Notification {
        Notification {
            id,
            message: self.message,
            date: self.date,
            status: self.status,
            for_user: self.for_user,
            checked: false,
        }
    }
}

/// Creates notifications and tracks which ones their recipient has seen.
#[derive(Clone)]
pub struct NotificationTracker {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationTracker {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, draft), fields(for_user = draft.for_user))]
    pub async fn create(&self, draft: NotificationDraft) -> Result<Notification> {
        let status: NotificationStatus = draft.status.parse()?;
        if draft.message.is_empty() {
            return Err(Error::InvalidInput("message is required".into()));
        }
        let notification = self
            .repo
            .create_notification(NewNotification {
                message: draft.message,
                date: unix_timestamp(),
                status,
                for_user: draft.for_user,
            })
            .await?;
        info!(notification_id = notification.id, "Notification created");
        Ok(notification)
    }

    pub async fn find_unread_for(&self, user_id: i64) -> Result<Vec<Notification>> {
        self.repo.find_unread_for(user_id).await
    }

    /// Acknowledge `ids` on behalf of `user_id`. Ids addressed to anyone else
    /// are ignored.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn check(&self, ids: &[i64], user_id: i64) -> Result<u64> {
        if ids.is_empty() {
            return Err(Error::InvalidInput("indexes are required".into()));
        }
        let updated = self.repo.check_notifications(ids, user_id).await?;
        info!(user_id, updated, "Notifications checked");
        Ok(updated)
    }
}
