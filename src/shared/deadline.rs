//! Cancellation signal with an absolute deadline.
//!
//! Fires when the wall-clock budget runs out or when `cancel()` is called,
//! whichever comes first. Cheap to clone; all clones observe the same signal.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Deadline {
    at: Instant,
    cancelled: Arc<watch::Sender<bool>>,
}

impl Deadline {
    /// Deadline at an absolute instant.
    pub fn at(at: Instant) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            at,
            cancelled: Arc::new(tx),
        }
    }

    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self::at(Instant::now() + budget)
    }

    /// Time left before expiry (zero once expired or cancelled).
    pub fn remaining(&self) -> Duration {
        if *self.cancelled.borrow() {
            return Duration::ZERO;
        }
        self.at.saturating_duration_since(Instant::now())
    }

    /// Fire the signal now, regardless of the deadline.
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_expired(&self) -> bool {
        *self.cancelled.borrow() || Instant::now() >= self.at
    }

    /// Resolves once the deadline passes or `cancel()` is called.
    pub async fn expired(&self) {
        let mut rx = self.cancelled.subscribe();
        if *rx.borrow_and_update() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep_until(self.at) => {}
            // Err only if the sender is gone, which cannot happen while `self` holds it.
            _ = rx.wait_for(|cancelled| *cancelled) => {}
        }
    }
}
