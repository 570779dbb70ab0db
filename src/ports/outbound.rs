//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Ack, Article, DomainError, User};

/// Listing page scraper.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch at most `limit` articles from the listing at `url`, in page order.
    ///
    /// Fails on network error, timeout, or when the page yields no articles.
    async fn fetch(&self, url: &str, limit: usize) -> Result<Vec<Article>, DomainError>;
}

/// Registered users store.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Snapshot of all registered users.
    async fn list_users(&self) -> Result<Vec<User>, DomainError>;
}

/// Message transport.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to one recipient. Any non-success response is an error.
    async fn send(&self, recipient_id: i64, text: &str) -> Result<Ack, DomainError>;
}
