use backoff::ExponentialBackoff;
use std::time::Duration;

pub use interfaces::defs::{Article, FeedSource, ProcessedRecord, RecordStatus, SummaryRequest};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
    pub retry: RetryConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            timeout_seconds: 10,
            max_feed_size_mb: 10,
            max_redirects: 5,
            retry: RetryConfig::default(),
        }
    }
}

/// Bounded exponential backoff shared by feed fetches and collaborator calls.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1_000,
            multiplier: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn backoff(&self) -> ExponentialBackoff {
        let initial = Duration::from_millis(self.initial_delay_ms);
        ExponentialBackoff {
            current_interval: initial,
            initial_interval: initial,
            max_interval: self.max_delay(),
            multiplier: self.multiplier,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub articles: Vec<Article>,
    /// Entries dropped for lacking a title or a link.
    pub malformed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to fetch feed {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid keyword configuration: {0}")]
    ClassificationConfig(String),

    #[error("Enrichment failed during {stage}: {reason}")]
    Enrichment { stage: String, reason: String },

    #[error("Failed to write sink {path}: {reason}")]
    SinkWrite { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{service} error: {message}")]
    Remote {
        service: String,
        message: String,
        transient: bool,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

impl IndexerError {
    /// Whether another attempt at the same call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            IndexerError::Http(e) => {
                if let Some(status) = e.status() {
                    is_retryable_status(status.as_u16())
                } else {
                    e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
                }
            }
            IndexerError::HttpStatus { status, .. } => is_retryable_status(*status),
            IndexerError::Remote { transient, .. } => *transient,
            _ => false,
        }
    }

    /// Fatal errors abort the run instead of being counted and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IndexerError::ClassificationConfig(_)
                | IndexerError::SinkWrite { .. }
                | IndexerError::Config(_)
        )
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

pub type Result<T> = std::result::Result<T, IndexerError>;
