//! Telegram Bot API adapter. Implements Notifier via `sendMessage` form POSTs.

use crate::domain::{Ack, DomainError};
use crate::ports::Notifier;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Parse mode expected by the message formatter.
const PARSE_MODE: &str = "Markdown";

/// Subset of the Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram Bot API notifier.
///
/// The bot token is part of the endpoint path, so the endpoint is never logged.
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
}

impl TelegramNotifier {
    /// # Arguments
    /// * `api_base` - Bot API root (e.g. "https://api.telegram.org")
    /// * `token` - bot token from @BotFather
    /// * `timeout` - per-request timeout
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Notifier(format!("HTTP client init failed: {}", e)))?;
        Ok(Self {
            client,
            endpoint: send_message_endpoint(api_base, token),
        })
    }
}

fn send_message_endpoint(api_base: &str, token: &str) -> String {
    format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token)
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, recipient_id: i64, text: &str) -> Result<Ack, DomainError> {
        let chat_id = recipient_id.to_string();
        let form = [
            ("chat_id", chat_id.as_str()),
            ("text", text),
            ("parse_mode", PARSE_MODE),
        ];

        // reqwest errors embed the URL (and with it the token); strip it.
        let res = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| DomainError::Notifier(format!("Request failed: {}", e.without_url())))?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() || parsed.as_ref().is_some_and(|r| !r.ok) {
            let description = parsed
                .and_then(|r| r.description)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(DomainError::Notifier(format!(
                "Telegram API error {}: {}",
                status, description
            )));
        }

        let message_id = parsed.and_then(|r| r.result).map(|m| m.message_id);
        debug!(recipient_id, ?message_id, "sendMessage acknowledged");
        Ok(Ack { message_id })
    }
}
