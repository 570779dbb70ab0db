//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod delivery;
pub mod entities;
pub mod errors;

pub use delivery::{AggregateResult, BroadcastFailure, DeliveryOutcome, DeliveryStatus};
pub use entities::{Ack, Article, Category, CategoryFeed, Digest, User};
pub use errors::{CancelPoint, DeliveryError, DomainError};
