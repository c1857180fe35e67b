use crate::types::Result;
use async_trait::async_trait;

/// Transport for raw feed documents. The HTTP implementation is
/// [`crate::fetcher::Fetcher`]; tests substitute canned responses.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the body of the feed at `url`
    async fn fetch_feed(&self, url: &str) -> Result<String>;
}
