//! Wiring & DI. Entry point: load config, bootstrap adapters, inject into the job, run once.
//! No business logic here. Any failure exits non-zero so the scheduler sees it.

use dotenv::dotenv;
use hn_digest::adapters::hackernews::HackerNewsSource;
use hn_digest::adapters::persistence::SqliteUserDirectory;
use hn_digest::adapters::telegram::{DryRunNotifier, TelegramNotifier};
use hn_digest::ports::{ArticleSource, Notifier, UserDirectory};
use hn_digest::shared::config::AppConfig;
use hn_digest::usecases::{Broadcaster, CategoryAggregator, DigestJob, MessageFormatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started = Instant::now();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    let concurrency_limit = cfg.concurrency_limit()?;
    let per_category_limit = cfg.per_category_limit_or_default();
    let feeds = cfg.category_feeds()?;

    // --- Notifier: real Bot API unless dry run ---
    let notifier: Arc<dyn Notifier> = if cfg.is_dry_run() {
        warn!("dry run: messages will be logged, not sent");
        Arc::new(DryRunNotifier::new())
    } else {
        Arc::new(TelegramNotifier::new(
            &cfg.telegram_api_base_or_default(),
            &cfg.telegram_bot_token()?,
            cfg.request_timeout(),
        )?)
    };

    // --- Article source and user directory ---
    let source: Arc<dyn ArticleSource> = Arc::new(HackerNewsSource::new(cfg.request_timeout())?);
    let directory: Arc<dyn UserDirectory> = Arc::new(
        SqliteUserDirectory::connect(
            &cfg.database_url_or_default(),
            cfg.database_auth_token.as_deref(),
        )
        .await?,
    );

    info!(
        categories = feeds.len(),
        per_category_limit,
        concurrency = concurrency_limit.get(),
        timeout_secs = cfg.run_timeout().as_secs(),
        "starting digest run"
    );

    let job = DigestJob::new(
        CategoryAggregator::new(source),
        directory,
        Broadcaster::new(notifier, MessageFormatter::new(per_category_limit)),
        concurrency_limit,
        cfg.run_timeout(),
    );

    let outcome = job.run(&feeds).await;
    let elapsed = started.elapsed();

    match outcome {
        Ok(delivered) => {
            info!(
                delivered,
                elapsed_ms = elapsed.as_millis() as u64,
                "digest sent to all users"
            );
            Ok(())
        }
        Err(e) => {
            if e.is_fatal_before_delivery() {
                error!(error = %e, "run aborted before delivery");
            } else {
                error!(error = %e, "run finished with delivery failures");
            }
            info!(elapsed_ms = elapsed.as_millis() as u64, "execution time");
            Err(e.into())
        }
    }
}
