//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: the digest job calls into infrastructure through these.

pub mod outbound;

pub use outbound::{ArticleSource, Notifier, UserDirectory};
