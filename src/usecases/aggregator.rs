//! Builds the run's Digest: one ArticleSource call per configured category.
//!
//! Sequential and fail-fast. A digest is only produced when every category yielded articles.

use crate::domain::{Category, CategoryFeed, Digest, DomainError};
use crate::ports::ArticleSource;
use std::sync::Arc;
use tracing::{error, info};

pub struct CategoryAggregator {
    source: Arc<dyn ArticleSource>,
}

impl CategoryAggregator {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self { source }
    }

    /// Fetch every feed in order. The first failure aborts the whole aggregation.
    pub async fn aggregate(&self, feeds: &[CategoryFeed]) -> Result<Digest, DomainError> {
        let mut categories = Vec::with_capacity(feeds.len());

        for feed in feeds {
            let mut articles = match self.source.fetch(&feed.url, feed.limit).await {
                Ok(a) => a,
                Err(e) => {
                    error!(category = %feed.name, url = %feed.url, error = %e, "category fetch failed");
                    return Err(e);
                }
            };
            if articles.is_empty() {
                return Err(DomainError::NoArticles(feed.url.clone()));
            }
            articles.truncate(feed.limit);

            info!(
                category = %feed.name,
                count = articles.len(),
                "fetched category"
            );
            categories.push(Category {
                name: feed.name.clone(),
                articles,
            });
        }

        let digest = Digest::new(categories);
        info!(
            categories = digest.categories().len(),
            articles = digest.article_count(),
            "digest assembled"
        );
        Ok(digest)
    }
}
