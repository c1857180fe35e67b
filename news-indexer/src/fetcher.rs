use crate::retry::retry_with_backoff;
use crate::traits::FeedClient;
use crate::types::{FetchConfig, IndexerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(IndexerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(IndexerError::FeedTooLarge { size_mb });
            }
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl FeedClient for Fetcher {
    async fn fetch_feed(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(IndexerError::Fetch {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let start = Instant::now();
        debug!("Fetching feed: {}", url);

        let content = retry_with_backoff(&self.config.retry, url, || self.fetch_once(url)).await?;

        info!(
            "Fetched feed: {} ({} bytes in {}ms)",
            url,
            content.len(),
            start.elapsed().as_millis()
        );
        Ok(content)
    }
}

// Some publishers reject obvious bot clients, so requests look like a browser.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/rss+xml,application/atom+xml,application/xml;q=0.9,text/html;q=0.8,*/*;q=0.7"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers
}
