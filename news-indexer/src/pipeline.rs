use crate::classifier::{KeywordSet, RecencyWindow};
use crate::dedup::SeenSet;
use crate::enrichment::{EnrichmentStage, Enricher};
use crate::reader::{FeedEvent, FeedReader};
use crate::sink::{CsvSink, UploadLog};
use crate::traits::FeedClient;
use crate::types::{Article, FeedSource, Result};
use futures::stream::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct FeedFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleFailure {
    pub url: String,
    pub stage: String,
    pub error: String,
}

/// Counters for one run. Every skipped feed, entry or article lands in
/// exactly one bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub feeds_total: usize,
    pub feeds_succeeded: usize,
    pub failed_feeds: Vec<FeedFailure>,
    pub articles_seen: usize,
    pub malformed_entries: usize,
    pub stale_skipped: usize,
    pub irrelevant: usize,
    pub duplicates: usize,
    pub summarize_failures: usize,
    pub index_failures: usize,
    pub failed_articles: Vec<ArticleFailure>,
    pub records_indexed: usize,
    pub rows_written: usize,
}

impl RunSummary {
    pub fn feeds_failed(&self) -> usize {
        self.failed_feeds.len()
    }

    pub fn enrichment_failures(&self) -> usize {
        self.summarize_failures + self.index_failures
    }

    pub fn log(&self) {
        info!(
            "Run summary: {}/{} feeds read, {} articles, {} malformed, {} stale, {} irrelevant, {} duplicates",
            self.feeds_succeeded,
            self.feeds_total,
            self.articles_seen,
            self.malformed_entries,
            self.stale_skipped,
            self.irrelevant,
            self.duplicates
        );
        info!(
            "Run summary: {} indexed, {} rows written, {} summarize failures, {} index failures",
            self.records_indexed, self.rows_written, self.summarize_failures, self.index_failures
        );
        for failure in &self.failed_feeds {
            warn!("Feed failed: {} ({})", failure.url, failure.error);
        }
        for failure in &self.failed_articles {
            warn!("Article failed at {}: {} ({})", failure.stage, failure.url, failure.error);
        }
    }
}

/// Fetch → recency → keyword → dedup → enrich → sink, one article at a time.
pub struct IndexingPipeline {
    client: Arc<dyn FeedClient>,
    keywords: KeywordSet,
    recency: RecencyWindow,
    enricher: Enricher,
    fetch_concurrency: usize,
    upload_log: Option<UploadLog>,
}

impl IndexingPipeline {
    pub fn new(client: Arc<dyn FeedClient>, keywords: KeywordSet, enricher: Enricher) -> Self {
        Self {
            client,
            keywords,
            recency: RecencyWindow::unbounded(),
            enricher,
            fetch_concurrency: 1,
            upload_log: None,
        }
    }

    pub fn with_recency(mut self, recency: RecencyWindow) -> Self {
        self.recency = recency;
        self
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    pub fn with_upload_log(mut self, upload_log: UploadLog) -> Self {
        self.upload_log = Some(upload_log);
        self
    }

    /// Process every feed once. Feed, entry and enrichment failures are
    /// counted and skipped; only a sink write failure aborts the run.
    pub async fn run(&mut self, feeds: Vec<FeedSource>, seen: &mut SeenSet, sink: &mut CsvSink) -> Result<RunSummary> {
        let mut summary = RunSummary {
            feeds_total: feeds.len(),
            ..Default::default()
        };

        info!(
            "Starting run over {} feeds with {} keywords ({} URLs already seen)",
            feeds.len(),
            self.keywords.len(),
            seen.len()
        );
        debug!("Keywords: {}", self.keywords.keywords().join(", "));
        if let Some(cutoff) = self.recency.cutoff() {
            info!("Skipping articles published before {}", cutoff.to_rfc3339());
        }

        let reader = FeedReader::new(self.client.clone(), feeds).with_concurrency(self.fetch_concurrency);
        let mut events = Box::pin(reader.into_stream());

        while let Some(event) = events.next().await {
            match event {
                FeedEvent::Article(article) => {
                    summary.articles_seen += 1;
                    self.process_article(article, seen, sink, &mut summary).await?;
                }
                FeedEvent::FeedCompleted {
                    source,
                    title,
                    entries,
                    malformed,
                } => {
                    info!(
                        "Finished feed {} ({}): {} entries, {} malformed",
                        source.url,
                        title.as_deref().unwrap_or("untitled"),
                        entries,
                        malformed
                    );
                    summary.feeds_succeeded += 1;
                    summary.malformed_entries += malformed;
                }
                FeedEvent::FeedFailed { source, error } => {
                    error!("Feed {} failed: {}", source.url, error);
                    summary.failed_feeds.push(FeedFailure {
                        url: source.url,
                        error: error.to_string(),
                    });
                }
            }
        }

        summary.rows_written = sink.rows_written();
        info!("Job complete. Results in {}", sink.path().display());
        Ok(summary)
    }

    async fn process_article(
        &mut self,
        article: Article,
        seen: &mut SeenSet,
        sink: &mut CsvSink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        if !self.recency.is_recent(&article) {
            info!("Skipping old article: {}", article.title);
            summary.stale_skipped += 1;
            return Ok(());
        }

        if !self.keywords.classify(&article) {
            debug!("Skipping (no keyword match): {}", article.title);
            summary.irrelevant += 1;
            return Ok(());
        }

        if !seen.check_and_mark(&article.url) {
            info!("Skipping duplicate URL: {}", article.title);
            summary.duplicates += 1;
            return Ok(());
        }

        let tags = self.keywords.matching_keywords(&article);
        let enriched = self.enricher.enrich(article, tags).await;

        if let Some((stage, error)) = enriched.failure {
            match stage {
                EnrichmentStage::Summarize => summary.summarize_failures += 1,
                EnrichmentStage::Index => summary.index_failures += 1,
            }
            summary.failed_articles.push(ArticleFailure {
                url: enriched.record.article.url.clone(),
                stage: stage.to_string(),
                error: error.to_string(),
            });
            return Ok(());
        }

        sink.append(&enriched.record)?;
        summary.records_indexed += 1;

        if let (Some(log), Some(document)) = (self.upload_log.as_mut(), enriched.document.as_ref()) {
            if let Err(e) = log.append(document) {
                warn!("Failed to append to upload log {}: {}", log.path().display(), e);
            }
        }

        Ok(())
    }
}
