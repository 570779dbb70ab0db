//! In-memory port implementations shared by unit tests.

use crate::domain::{Ack, Article, DomainError, User};
use crate::ports::{ArticleSource, Notifier, UserDirectory};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves canned listing pages. Unknown URLs fail like a network error.
/// Returns every article of a page regardless of `limit`.
#[derive(Default)]
pub struct StaticSource {
    pages: HashMap<String, Vec<Article>>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with `count` articles titled "<last path segment> story N".
    pub fn with_page(mut self, url: &str, count: usize) -> Self {
        let slug = url.rsplit('/').next().unwrap_or("page").to_string();
        let articles = (1..=count)
            .map(|i| {
                Article::new(
                    format!("{slug} story {i}"),
                    format!("https://news.ycombinator.com/item?id={i}"),
                )
            })
            .collect();
        self.pages.insert(url.to_string(), articles);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ArticleSource for StaticSource {
    async fn fetch(&self, url: &str, _limit: usize) -> Result<Vec<Article>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::Source(format!("GET {url}: connection refused")))
    }
}

/// Fixed user list, or a failing directory.
pub struct MemoryDirectory {
    users: Option<Vec<User>>,
    calls: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Some(users),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            users: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryDirectory {
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .clone()
            .ok_or_else(|| DomainError::Directory("connection refused".to_string()))
    }
}

/// Records every send and the peak number of concurrent sends.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(i64, String)>>,
    delay: Option<Duration>,
    fail_for: HashSet<i64>,
    panic_for: HashSet<i64>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_for(mut self, recipient_id: i64) -> Self {
        self.fail_for.insert(recipient_id);
        self
    }

    pub fn panicking_for(mut self, recipient_id: i64) -> Self {
        self.panic_for.insert(recipient_id);
        self
    }

    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient_id: i64, text: &str) -> Result<Ack, DomainError> {
        if self.panic_for.contains(&recipient_id) {
            panic!("notifier blew up for {recipient_id}");
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((recipient_id, text.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_for.contains(&recipient_id) {
            return Err(DomainError::Notifier(format!(
                "Telegram API error 400 Bad Request: chat {recipient_id} not found"
            )));
        }
        Ok(Ack {
            message_id: Some(recipient_id),
        })
    }
}
