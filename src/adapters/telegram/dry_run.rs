//! Dry-run notifier for rehearsing a run without contacting Telegram.
//!
//! Logs each message instead of sending it and always acknowledges.

use crate::domain::{Ack, DomainError};
use crate::ports::Notifier;
use std::time::Duration;
use tracing::info;

pub struct DryRunNotifier {
    /// Simulated network delay.
    delay: Duration,
}

impl DryRunNotifier {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(50),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for DryRunNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Notifier for DryRunNotifier {
    async fn send(&self, recipient_id: i64, text: &str) -> Result<Ack, DomainError> {
        info!(
            recipient_id,
            text_len = text.len(),
            "[DRY RUN] would send message"
        );
        tokio::time::sleep(self.delay).await;
        Ok(Ack::default())
    }
}
