//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use crate::domain::delivery::BroadcastFailure;
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Article source error: {0}")]
    Source(String),

    #[error("No articles found at {0}")]
    NoArticles(String),

    #[error("User directory error: {0}")]
    Directory(String),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Broadcast(#[from] BroadcastFailure),
}

impl DomainError {
    /// True for errors that abort a run before any delivery is attempted.
    pub fn is_fatal_before_delivery(&self) -> bool {
        matches!(
            self,
            DomainError::Source(_)
                | DomainError::NoArticles(_)
                | DomainError::Directory(_)
                | DomainError::Config(_)
        )
    }
}

/// Where a delivery task observed the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPoint {
    /// Deadline fired while waiting for an admission slot.
    BeforeAdmission,
    /// Slot acquired, but the deadline had already passed.
    AfterAdmission,
}

impl std::fmt::Display for CancelPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelPoint::BeforeAdmission => f.write_str("before admission"),
            CancelPoint::AfterAdmission => f.write_str("after admission"),
        }
    }
}

/// Per-user delivery failure. Never propagates past its own task.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("invalid-recipient-id: {value:?} is not a 64-bit integer")]
    InvalidRecipientId {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("delivery-failed: {0}")]
    DeliveryFailed(#[source] DomainError),

    #[error("cancelled ({0})")]
    Cancelled(CancelPoint),

    /// Task ended without reporting (e.g. a panic inside the notifier).
    #[error("task-lost: {0}")]
    TaskLost(String),
}

impl DeliveryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeliveryError::Cancelled(_))
    }
}
