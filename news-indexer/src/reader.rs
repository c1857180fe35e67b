use crate::parser::FeedParser;
use crate::traits::FeedClient;
use crate::types::{Article, FeedSource, IndexerError};
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// A feed that was read yields its articles followed by one `FeedCompleted`.
/// A feed that could not be fetched or parsed yields a single `FeedFailed`.
#[derive(Debug)]
pub enum FeedEvent {
    Article(Article),
    FeedCompleted {
        source: FeedSource,
        /// Channel title as published by the feed, if any.
        title: Option<String>,
        entries: usize,
        malformed: usize,
    },
    FeedFailed {
        source: FeedSource,
        error: IndexerError,
    },
}

pub struct FeedReader {
    client: Arc<dyn FeedClient>,
    sources: Vec<FeedSource>,
    concurrency: usize,
}

impl FeedReader {
    pub fn new(client: Arc<dyn FeedClient>, sources: Vec<FeedSource>) -> Self {
        Self {
            client,
            sources,
            concurrency: 1,
        }
    }

    /// Fetch up to `concurrency` feeds at once. Events are still yielded in
    /// feed-list order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Consume the reader into a one-pass stream of events. Nothing is
    /// fetched until the stream is polled.
    pub fn into_stream(self) -> impl Stream<Item = FeedEvent> + Send {
        let client = self.client;
        stream::iter(self.sources)
            .map(move |source| {
                let client = client.clone();
                async move { read_feed(client.as_ref(), source).await }
            })
            .buffered(self.concurrency)
            .flat_map(stream::iter)
    }
}

async fn read_feed(client: &dyn FeedClient, source: FeedSource) -> Vec<FeedEvent> {
    info!("Parsing feed: {}", source.url);

    let content = match client.fetch_feed(&source.url).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to fetch {}: {}", source.url, e);
            let error = match e {
                IndexerError::Fetch { .. } => e,
                other => IndexerError::Fetch {
                    url: source.url.clone(),
                    reason: other.to_string(),
                },
            };
            return vec![FeedEvent::FeedFailed { source, error }];
        }
    };

    match FeedParser::parse_feed(&content, &source) {
        Ok(parsed) => {
            let entries = parsed.articles.len();
            let mut events: Vec<FeedEvent> = parsed.articles.into_iter().map(FeedEvent::Article).collect();
            events.push(FeedEvent::FeedCompleted {
                source,
                title: parsed.title,
                entries,
                malformed: parsed.malformed,
            });
            events
        }
        Err(e) => {
            warn!("Skipping unparseable feed {}: {}", source.url, e);
            vec![FeedEvent::FeedFailed { source, error: e }]
        }
    }
}
