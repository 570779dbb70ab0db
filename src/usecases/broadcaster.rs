//! Concurrent delivery of one shared digest to every user.
//!
//! - One task per user; a semaphore with K permits gates the remote send
//! - Waiting for a permit races the deadline; the deadline is re-checked once admitted
//! - In-flight sends are never aborted; the broadcaster drains every task before returning
//! - Each task reports exactly one outcome through an mpsc channel into a single aggregator

use crate::domain::{
    AggregateResult, CancelPoint, DeliveryError, DeliveryOutcome, Digest, User,
};
use crate::ports::Notifier;
use crate::shared::Deadline;
use crate::usecases::formatter::MessageFormatter;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Broadcaster. Holds the transport and formatter shared by all delivery tasks.
pub struct Broadcaster {
    notifier: Arc<dyn Notifier>,
    formatter: Arc<MessageFormatter>,
}

impl Broadcaster {
    pub fn new(notifier: Arc<dyn Notifier>, formatter: MessageFormatter) -> Self {
        Self {
            notifier,
            formatter: Arc::new(formatter),
        }
    }

    /// Deliver `digest` to every user, at most `concurrency_limit` sends at a time.
    ///
    /// Returns once every user has a terminal outcome. The result's outcome count
    /// always equals `users.len()`; duplicates in `users` are delivered twice.
    pub async fn broadcast(
        &self,
        deadline: &Deadline,
        digest: Arc<Digest>,
        users: Vec<User>,
        concurrency_limit: NonZeroUsize,
    ) -> AggregateResult {
        let total = users.len();
        let mut result = AggregateResult::default();
        if total == 0 {
            info!("no users to deliver to");
            return result;
        }

        info!(
            users = total,
            concurrency = concurrency_limit.get(),
            remaining_ms = deadline.remaining().as_millis() as u64,
            "broadcast started"
        );

        let slots = Arc::new(Semaphore::new(concurrency_limit.get()));
        let (tx, mut rx) = mpsc::channel::<(usize, DeliveryOutcome)>(total);
        let mut tasks = JoinSet::new();

        for (idx, user) in users.iter().cloned().enumerate() {
            let tx = tx.clone();
            let slots = Arc::clone(&slots);
            let deadline = deadline.clone();
            let digest = Arc::clone(&digest);
            let notifier = Arc::clone(&self.notifier);
            let formatter = Arc::clone(&self.formatter);

            tasks.spawn(async move {
                let outcome =
                    deliver_one(user, &slots, &deadline, &digest, &*notifier, &formatter).await;
                // Capacity equals the task count, so this never waits.
                let _ = tx.send((idx, outcome)).await;
            });
        }
        drop(tx);

        let mut reported = vec![false; total];
        while let Some((idx, outcome)) = rx.recv().await {
            reported[idx] = true;
            result.record(outcome);
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "delivery task ended abnormally");
            }
        }

        // A task that panicked never sent its outcome; account for it anyway.
        for (idx, user) in users.into_iter().enumerate() {
            if !reported[idx] {
                result.record(DeliveryOutcome::failed(
                    user,
                    DeliveryError::TaskLost("task ended without reporting".to_string()),
                ));
            }
        }

        info!(
            succeeded = result.succeeded,
            failed = result.failed.len(),
            cancelled = result.cancelled(),
            "broadcast finished"
        );
        result
    }
}

/// One user's delivery: admission -> parse recipient -> deadline re-check -> format -> send.
async fn deliver_one(
    user: User,
    slots: &Semaphore,
    deadline: &Deadline,
    digest: &Digest,
    notifier: &dyn Notifier,
    formatter: &MessageFormatter,
) -> DeliveryOutcome {
    let _permit = tokio::select! {
        biased;
        _ = deadline.expired() => {
            debug!(user = %user.display_name, "deadline reached before admission");
            return DeliveryOutcome::failed(user, DeliveryError::Cancelled(CancelPoint::BeforeAdmission));
        }
        permit = slots.acquire() => match permit {
            Ok(p) => p,
            // The semaphore is never closed while tasks run; treat it like cancellation.
            Err(_) => {
                return DeliveryOutcome::failed(user, DeliveryError::Cancelled(CancelPoint::BeforeAdmission));
            }
        },
    };

    let recipient_id = match user.external_id.parse::<i64>() {
        Ok(id) => id,
        Err(source) => {
            warn!(user = %user.display_name, external_id = %user.external_id, "invalid recipient id");
            let value = user.external_id.clone();
            return DeliveryOutcome::failed(
                user,
                DeliveryError::InvalidRecipientId { value, source },
            );
        }
    };

    if deadline.is_expired() {
        debug!(user = %user.display_name, "deadline reached after admission");
        return DeliveryOutcome::failed(user, DeliveryError::Cancelled(CancelPoint::AfterAdmission));
    }

    let text = formatter.format(&user.display_name, digest);
    match notifier.send(recipient_id, &text).await {
        Ok(ack) => {
            info!(
                user = %user.display_name,
                recipient_id,
                message_id = ?ack.message_id,
                "message sent"
            );
            DeliveryOutcome::delivered(user)
        }
        Err(e) => {
            warn!(user = %user.display_name, recipient_id, error = %e, "message delivery failed");
            DeliveryOutcome::failed(user, DeliveryError::DeliveryFailed(e))
        }
    }
}
