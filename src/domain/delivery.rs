//! Delivery outcomes and their aggregation for one broadcast run.

use crate::domain::entities::User;
use crate::domain::errors::{DeliveryError, DomainError};
use std::fmt;

/// Terminal state of one user's delivery task.
#[derive(Debug)]
pub enum DeliveryStatus {
    Delivered,
    Failed(DeliveryError),
}

/// Result of one user's delivery attempt. Produced exactly once per user per run.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub user: User,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn delivered(user: User) -> Self {
        Self {
            user,
            status: DeliveryStatus::Delivered,
        }
    }

    pub fn failed(user: User, error: DeliveryError) -> Self {
        Self {
            user,
            status: DeliveryStatus::Failed(error),
        }
    }
}

/// All outcomes of a broadcast. `failed` is in completion order, not input order.
#[derive(Debug, Default)]
pub struct AggregateResult {
    pub succeeded: usize,
    pub failed: Vec<(User, DeliveryError)>,
}

impl AggregateResult {
    pub fn record(&mut self, outcome: DeliveryOutcome) {
        match outcome.status {
            DeliveryStatus::Delivered => self.succeeded += 1,
            DeliveryStatus::Failed(e) => self.failed.push((outcome.user, e)),
        }
    }

    /// Number of users accounted for.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn cancelled(&self) -> usize {
        self.failed.iter().filter(|(_, e)| e.is_cancelled()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Any failure at all (partial or total) becomes an error carrying the full list.
    pub fn into_result(self) -> Result<usize, DomainError> {
        if self.failed.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(DomainError::Broadcast(BroadcastFailure {
                succeeded: self.succeeded,
                failed: self.failed,
            }))
        }
    }
}

/// Aggregate failure surfaced to the top-level caller.
#[derive(Debug)]
pub struct BroadcastFailure {
    pub succeeded: usize,
    pub failed: Vec<(User, DeliveryError)>,
}

impl fmt::Display for BroadcastFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} deliveries failed",
            self.failed.len(),
            self.succeeded + self.failed.len()
        )?;
        for (user, err) in &self.failed {
            write!(f, "; {} ({}): {}", user.display_name, user.external_id, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BroadcastFailure {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CancelPoint;

    #[test]
    fn test_into_result_ok_when_nothing_failed() {
        let mut result = AggregateResult::default();
        result.record(DeliveryOutcome::delivered(User::new("1", "alice", "42")));
        result.record(DeliveryOutcome::delivered(User::new("2", "bob", "43")));

        assert_eq!(result.total(), 2);
        assert_eq!(result.into_result().unwrap(), 2);
    }

    #[test]
    fn test_partial_failure_is_an_error_with_full_list() {
        let mut result = AggregateResult::default();
        result.record(DeliveryOutcome::delivered(User::new("1", "alice", "42")));
        result.record(DeliveryOutcome::failed(
            User::new("2", "bob", "43"),
            DeliveryError::Cancelled(CancelPoint::BeforeAdmission),
        ));

        assert_eq!(result.cancelled(), 1);
        let err = result.into_result().unwrap_err();
        match err {
            DomainError::Broadcast(failure) => {
                assert_eq!(failure.succeeded, 1);
                assert_eq!(failure.failed.len(), 1);
                assert_eq!(failure.failed[0].0.display_name, "bob");
                let text = failure.to_string();
                assert!(text.starts_with("1 of 2 deliveries failed"));
                assert!(text.contains("bob (43): cancelled (before admission)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
