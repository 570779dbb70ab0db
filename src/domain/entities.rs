//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/SQL types here — adapters map into these.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single story scraped from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Absolute URL.
    pub link: String,
}

impl Article {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Named group of articles. Article order is the ranking order of the source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub articles: Vec<Article>,
}

/// Categorized content for one run. Built once, then shared read-only (`Arc<Digest>`)
/// by every delivery task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    categories: Vec<Category>,
}

impl Digest {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn article_count(&self) -> usize {
        self.categories.iter().map(|c| c.articles.len()).sum()
    }
}

/// One configured listing: category name, page URL and how many stories to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFeed {
    pub name: String,
    pub url: String,
    pub limit: usize,
}

impl CategoryFeed {
    pub fn new(name: impl Into<String>, url: impl Into<String>, limit: usize) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            limit,
        }
    }
}

/// Registered bot user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal row id (opaque).
    pub id: String,
    pub display_name: String,
    /// Telegram chat id as stored; must parse as i64 before sending.
    pub external_id: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        external_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            external_id: external_id.into(),
            created_at: None,
        }
    }
}

/// Acknowledgement returned by a notifier for one delivered message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ack {
    /// Message id assigned by the transport, when it reports one.
    pub message_id: Option<i64>,
}
