//! Application configuration. Bot credentials, database, run limits, categories.

use crate::domain::{CategoryFeed, DomainError};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Default number of simultaneous Telegram sends.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 10;

/// Default wall-clock budget for one run (fetch + broadcast).
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 300;

/// Default per-request timeout for listing pages and Bot API calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default number of stories kept (and rendered) per category.
pub const DEFAULT_PER_CATEGORY_LIMIT: usize = 10;

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub const DEFAULT_DATABASE_URL: &str = "./data/users.db";

/// One category entry from the config file. `limit` falls back to `per_category_limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Bot API token. Read from HN_DIGEST_TELEGRAM_BOT_TOKEN or TELEGRAM_BOT_TOKEN.
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Bot API base URL. Overridable for self-hosted Bot API servers.
    #[serde(default)]
    pub telegram_api_base: Option<String>,

    /// Local SQLite path or remote `libsql://` URL.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Auth token for a remote libsql database.
    #[serde(default)]
    pub database_auth_token: Option<String>,

    #[serde(default)]
    pub concurrency_limit: Option<usize>,

    #[serde(default)]
    pub run_timeout_secs: Option<u64>,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub per_category_limit: Option<usize>,

    /// Log messages instead of sending them.
    #[serde(default)]
    pub dry_run: Option<bool>,

    /// Listings to scrape, in digest order. Only settable from the config file.
    #[serde(default)]
    pub categories: Option<Vec<CategoryConfig>>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("HN_DIGEST_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("HN_DIGEST").try_parsing(true));
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // TELEGRAM_BOT_TOKEN is read directly (no prefix) so existing .env files keep working
        if cfg.telegram_bot_token.is_none() {
            cfg.telegram_bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty());
        }
        Ok(cfg)
    }

    /// Bot token, required unless running dry.
    pub fn telegram_bot_token(&self) -> Result<String, DomainError> {
        self.telegram_bot_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                DomainError::Config(
                    "TELEGRAM_BOT_TOKEN (or HN_DIGEST_TELEGRAM_BOT_TOKEN) is required".to_string(),
                )
            })
    }

    pub fn telegram_api_base_or_default(&self) -> String {
        self.telegram_api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string())
    }

    pub fn database_url_or_default(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }

    /// Admission slots for the broadcaster. Zero is rejected rather than clamped.
    pub fn concurrency_limit(&self) -> Result<NonZeroUsize, DomainError> {
        let n = self.concurrency_limit.unwrap_or(DEFAULT_CONCURRENCY_LIMIT);
        NonZeroUsize::new(n)
            .ok_or_else(|| DomainError::Config("concurrency_limit must be at least 1".to_string()))
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs.unwrap_or(DEFAULT_RUN_TIMEOUT_SECS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn per_category_limit_or_default(&self) -> usize {
        self.per_category_limit
            .unwrap_or(DEFAULT_PER_CATEGORY_LIMIT)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }

    /// Configured categories, or the three front listings when none are configured.
    pub fn category_feeds(&self) -> Result<Vec<CategoryFeed>, DomainError> {
        let default_limit = self.per_category_limit_or_default();
        let feeds: Vec<CategoryFeed> = match &self.categories {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|c| CategoryFeed::new(&c.name, &c.url, c.limit.unwrap_or(default_limit)))
                .collect(),
            _ => default_category_feeds(default_limit),
        };
        if let Some(bad) = feeds.iter().find(|f| f.limit == 0) {
            return Err(DomainError::Config(format!(
                "category {:?} has a limit of 0",
                bad.name
            )));
        }
        Ok(feeds)
    }
}

/// Top stories, Ask HN and Show HN.
pub fn default_category_feeds(limit: usize) -> Vec<CategoryFeed> {
    vec![
        CategoryFeed::new("Top Stories", "https://news.ycombinator.com/news", limit),
        CategoryFeed::new("Ask HN", "https://news.ycombinator.com/ask", limit),
        CategoryFeed::new("Show HN", "https://news.ycombinator.com/show", limit),
    ]
}
