//! One scheduled run: build digest -> list users -> broadcast.
//!
//! - Fetch failures abort before the user directory is touched
//! - Directory failures abort before any message is sent
//! - Any per-user failure turns the whole run into an error carrying the full list

use crate::domain::{CategoryFeed, DomainError};
use crate::ports::UserDirectory;
use crate::shared::Deadline;
use crate::usecases::aggregator::CategoryAggregator;
use crate::usecases::broadcaster::Broadcaster;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

pub struct DigestJob {
    aggregator: CategoryAggregator,
    directory: Arc<dyn UserDirectory>,
    broadcaster: Broadcaster,
    concurrency_limit: NonZeroUsize,
    run_timeout: Duration,
}

impl DigestJob {
    pub fn new(
        aggregator: CategoryAggregator,
        directory: Arc<dyn UserDirectory>,
        broadcaster: Broadcaster,
        concurrency_limit: NonZeroUsize,
        run_timeout: Duration,
    ) -> Self {
        Self {
            aggregator,
            directory,
            broadcaster,
            concurrency_limit,
            run_timeout,
        }
    }

    /// Run once. The deadline starts now and covers the whole run.
    /// Returns the number of users the digest was delivered to.
    pub async fn run(&self, feeds: &[CategoryFeed]) -> Result<usize, DomainError> {
        let deadline = Deadline::after(self.run_timeout);
        self.run_until(&deadline, feeds).await
    }

    pub async fn run_until(
        &self,
        deadline: &Deadline,
        feeds: &[CategoryFeed],
    ) -> Result<usize, DomainError> {
        let digest = Arc::new(self.aggregator.aggregate(feeds).await?);

        let users = self.directory.list_users().await.inspect_err(|e| {
            error!(error = %e, "failed to list users");
        })?;
        info!(users = users.len(), "fetched users");

        let result = self
            .broadcaster
            .broadcast(deadline, digest, users, self.concurrency_limit)
            .await;
        result.into_result()
    }
}
