//! Telegram Bot API sink.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{NotifyError, NotifySink};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Posts messages to one chat through `sendMessage`.
#[derive(Debug, Clone)]
pub struct TelegramSink {
    http: reqwest::Client,
    url: String,
    chat_id: i64,
}

impl TelegramSink {
    pub fn new(bot_token: &str, chat_id: i64) -> Result<Self, NotifyError> {
        // Install ring as the default crypto provider (no-op if already installed).
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        Ok(Self {
            http,
            url: format!("{TELEGRAM_API_URL}/bot{bot_token}/sendMessage"),
            chat_id,
        })
    }
}

#[async_trait]
impl NotifySink for TelegramSink {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&SendMessage {
                chat_id: self.chat_id,
                text: message,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        debug!(chat_id = self.chat_id, "Telegram message sent");
        Ok(())
    }
}
