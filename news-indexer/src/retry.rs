use crate::types::{Result, RetryConfig};
use backoff::backoff::Backoff;
use std::future::Future;
use tracing::{debug, warn};

/// Run `operation` until it succeeds, fails with a non-transient error, or
/// the configured attempts run out. The last error is returned unchanged.
pub async fn retry_with_backoff<T, F, Fut>(config: &RetryConfig, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.attempts();
    let mut backoff = config.backoff();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() && attempt < attempts => {
                let delay = backoff.next_backoff().unwrap_or_else(|| config.max_delay());
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:?}",
                    label, attempt, attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if attempt > 1 {
                    warn!("{}: giving up after {} attempts: {}", label, attempt, e);
                }
                return Err(e);
            }
        }
    }
}
