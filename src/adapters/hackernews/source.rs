//! HackerNews listing scraper. Implements ArticleSource over plain HTTP + HTML parsing.
//!
//! Each story is a `tr.athing` row; its title and href live in
//! `td.title > span.titleline > a`. Relative hrefs (`item?id=…`) are resolved
//! against the listing URL so every link is absolute.

use crate::domain::{Article, DomainError};
use crate::ports::ArticleSource;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const HN_HOST: &str = "news.ycombinator.com";

const ROW_SELECTOR: &str = "tr.athing";
const TITLE_LINK_SELECTOR: &str = "td.title > span.titleline > a";

pub struct HackerNewsSource {
    client: Client,
    allowed_hosts: Vec<String>,
    timeout: Duration,
}

impl HackerNewsSource {
    /// Scraper restricted to news.ycombinator.com with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Source(format!("HTTP client init failed: {}", e)))?;
        Ok(Self {
            client,
            allowed_hosts: vec![HN_HOST.to_string()],
            timeout,
        })
    }

    /// Replace the host allow list (mirrors and local fixtures).
    pub fn with_allowed_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    fn check_url(&self, url: &str) -> Result<Url, DomainError> {
        let parsed =
            Url::parse(url).map_err(|e| DomainError::Source(format!("invalid URL {url}: {e}")))?;
        let host = parsed.host_str().unwrap_or_default();
        if !self.allowed_hosts.iter().any(|h| h == host) {
            return Err(DomainError::Source(format!(
                "host {host:?} is not allowed (allowed: {})",
                self.allowed_hosts.join(", ")
            )));
        }
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl ArticleSource for HackerNewsSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str, limit: usize) -> Result<Vec<Article>, DomainError> {
        let page_url = self.check_url(url)?;

        let res = self
            .client
            .get(page_url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Source(format!(
                        "GET {url} timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    DomainError::Source(format!("GET {url} failed: {e}"))
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(DomainError::Source(format!("GET {url} returned {status}")));
        }

        let body = res
            .text()
            .await
            .map_err(|e| DomainError::Source(format!("reading {url} failed: {e}")))?;
        debug!(bytes = body.len(), "listing downloaded");

        let articles = parse_listing(&body, &page_url, limit);
        if articles.is_empty() {
            return Err(DomainError::NoArticles(url.to_string()));
        }

        info!(url, count = articles.len(), "scraped listing");
        Ok(articles)
    }
}

/// Extract up to `limit` stories from a listing page, in page order.
/// Rows without a title or href are skipped.
pub fn parse_listing(html: &str, base: &Url, limit: usize) -> Vec<Article> {
    let document = Html::parse_document(html);
    let (Ok(row_sel), Ok(link_sel)) = (
        Selector::parse(ROW_SELECTOR),
        Selector::parse(TITLE_LINK_SELECTOR),
    ) else {
        return Vec::new();
    };

    document
        .select(&row_sel)
        .filter_map(|row| {
            let anchor = row.select(&link_sel).next()?;
            let title = anchor.text().collect::<String>().trim().to_string();
            let href = anchor.value().attr("href")?.trim();
            if title.is_empty() || href.is_empty() {
                return None;
            }
            let link = base.join(href).ok()?;
            Some(Article::new(title, link.to_string()))
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = r#"
<html><body><table>
  <tr class="athing" id="1">
    <td class="title"><span class="rank">1.</span></td>
    <td class="title"><span class="titleline"><a href="https://example.com/rust">Rust 2.0 announced</a><span class="sitebit comhead"> (<a href="from?site=example.com">example.com</a>)</span></span></td>
  </tr>
  <tr><td class="subtext">100 points</td></tr>
  <tr class="athing" id="2">
    <td class="title"><span class="titleline"><a href="item?id=2">Ask HN: How do you test async code?</a></span></td>
  </tr>
  <tr class="athing" id="3">
    <td class="title"><span class="titleline"><a href="item?id=3">   </a></span></td>
  </tr>
  <tr class="athing" id="4">
    <td class="title"><span class="titleline"><a>No link here</a></span></td>
  </tr>
  <tr class="athing" id="5">
    <td class="title"><span class="titleline"><a href="item?id=5">Show HN: A tiny database</a></span></td>
  </tr>
</table></body></html>"#;

    fn base() -> Url {
        Url::parse("https://news.ycombinator.com/ask").unwrap()
    }

    #[test]
    fn test_parse_listing_resolves_links_and_skips_incomplete_rows() {
        let articles = parse_listing(LISTING, &base(), 10);

        assert_eq!(
            articles,
            vec![
                Article::new("Rust 2.0 announced", "https://example.com/rust"),
                Article::new(
                    "Ask HN: How do you test async code?",
                    "https://news.ycombinator.com/item?id=2"
                ),
                Article::new(
                    "Show HN: A tiny database",
                    "https://news.ycombinator.com/item?id=5"
                ),
            ]
        );
    }

    #[test]
    fn test_parse_listing_respects_limit() {
        let articles = parse_listing(LISTING, &base(), 1);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Rust 2.0 announced");
    }

    #[test]
    fn test_parse_listing_without_rows_is_empty() {
        assert!(parse_listing("<html><body>Sorry.</body></html>", &base(), 10).is_empty());
    }

    #[tokio::test]
    async fn test_disallowed_host_is_rejected_without_request() {
        let source = HackerNewsSource::new(Duration::from_secs(5)).unwrap();
        let err = source.fetch("https://example.com/news", 10).await.unwrap_err();
        assert!(matches!(err, DomainError::Source(msg) if msg.contains("not allowed")));
    }

    #[tokio::test]
    async fn test_fetch_from_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(LISTING, "text/html; charset=utf-8"))
            .mount(&server)
            .await;

        let source = HackerNewsSource::new(Duration::from_secs(5))
            .unwrap()
            .with_allowed_hosts(["127.0.0.1"]);
        let url = format!("{}/ask", server.uri());

        let articles = source.fetch(&url, 2).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].link, format!("{}/item?id=2", server.uri()));
    }

    #[tokio::test]
    async fn test_fetch_fails_on_http_status_and_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/show"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
            .mount(&server)
            .await;

        let source = HackerNewsSource::new(Duration::from_secs(5))
            .unwrap()
            .with_allowed_hosts(["127.0.0.1"]);

        let err = source.fetch(&format!("{}/news", server.uri()), 10).await.unwrap_err();
        assert!(matches!(err, DomainError::Source(msg) if msg.contains("503")));

        let err = source.fetch(&format!("{}/show", server.uri()), 10).await.unwrap_err();
        assert!(matches!(err, DomainError::NoArticles(_)));
    }
}
