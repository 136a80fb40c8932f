//! Outbound chat notifications.
//!
//! Messages go through a bounded queue drained by one worker task, so callers
//! never wait on the network. [`Notifier::shutdown`] closes the queue and
//! waits until everything already queued has been delivered.

#[cfg(feature = "telegram")]
pub mod telegram;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[cfg(feature = "telegram")]
pub use telegram::TelegramSink;

/// Errors that can occur while delivering a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// HTTP request to the chat API failed.
    #[error("Notify request error: {0}")]
    Request(String),

    /// The chat API returned a non-success status code.
    #[error("Notify API error (status {status}): {body}")]
    ApiError { status: u16, body: String },
}

/// Destination for outbound messages.
#[async_trait]
pub trait NotifySink: Send + Sync + 'static {
    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Handle to the notification queue.
pub struct Notifier {
    tx: mpsc::Sender<String>,
    worker: JoinHandle<()>,
}

impl Notifier {
    /// Spawn the worker. Must be called inside a Tokio runtime.
    pub fn spawn(sink: Arc<dyn NotifySink>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(capacity);
        let worker = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match sink.send(&message).await {
                    Ok(()) => debug!("Notification delivered"),
                    Err(e) => warn!(error = %e, "Notification delivery failed"),
                }
            }
        });
        Self { tx, worker }
    }

    /// Queue a message without waiting. Dropped with a warning when the queue
    /// is full.
    pub fn notify(&self, message: impl Into<String>) {
        match self.tx.try_send(message.into()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("Notification queue full, message dropped"),
            Err(TrySendError::Closed(_)) => warn!("Notification queue closed, message dropped"),
        }
    }

    /// Close the queue and wait for queued messages to be delivered.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "Notification worker ended abnormally");
        }
    }
}
