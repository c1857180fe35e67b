use crate::llm_adapter::Summarizer;
use crate::retry::retry_with_backoff;
use crate::search_index::{IndexDocument, SearchIndex};
use crate::types::{Article, IndexerError, ProcessedRecord, RetryConfig, SummaryRequest};
use crate::utils::text::truncate_chars;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub target_language: String,
    /// Longer article text is cut before it is sent to the summarizer.
    pub max_summary_input_chars: usize,
    pub max_content_chars: usize,
    pub retry: RetryConfig,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            target_language: "English".to_string(),
            max_summary_input_chars: 4_000,
            max_content_chars: 8_000,
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentStage {
    Summarize,
    Index,
}

impl fmt::Display for EnrichmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentStage::Summarize => write!(f, "summarize"),
            EnrichmentStage::Index => write!(f, "index"),
        }
    }
}

#[derive(Debug)]
pub struct EnrichedArticle {
    pub record: ProcessedRecord,
    pub document: Option<IndexDocument>,
    /// Set when the record failed; names the stage that gave up.
    pub failure: Option<(EnrichmentStage, IndexerError)>,
}

pub struct Enricher {
    summarizer: Arc<dyn Summarizer>,
    index: Arc<dyn SearchIndex>,
    config: EnrichmentConfig,
}

impl Enricher {
    pub fn new(summarizer: Arc<dyn Summarizer>, index: Arc<dyn SearchIndex>, config: EnrichmentConfig) -> Self {
        Self {
            summarizer,
            index,
            config,
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Summarize and index one relevant article. Never returns an error:
    /// a terminal failure is recorded on the returned record instead.
    pub async fn enrich(&self, article: Article, tags: Vec<String>) -> EnrichedArticle {
        let mut record = ProcessedRecord::new(article, true).with_tags(tags);

        if record.article.summary.is_empty() {
            warn!("No summary available in feed for: {}", record.article.title);
        } else {
            match self.summarize(&record.article).await {
                Ok(summary) => {
                    info!("Got summary for: {}", record.article.title);
                    record.translated_summary = Some(summary);
                }
                Err(e) => return self.fail(record, None, EnrichmentStage::Summarize, e),
            }
        }

        let document = IndexDocument::from_record(&record, self.config.max_content_chars);
        let label = format!("index {}", document.url);
        match retry_with_backoff(&self.config.retry, &label, || self.index.upload(&document)).await {
            Ok(()) => {
                record.mark_indexed();
                EnrichedArticle {
                    record,
                    document: Some(document),
                    failure: None,
                }
            }
            Err(e) => self.fail(record, Some(document), EnrichmentStage::Index, e),
        }
    }

    async fn summarize(&self, article: &Article) -> crate::types::Result<String> {
        let request = SummaryRequest {
            text: truncate_chars(&article.summary, self.config.max_summary_input_chars).to_string(),
            target_language: self.config.target_language.clone(),
        };
        info!(
            "Sending translation + summary request to {} for: {}",
            self.summarizer.adapter_name(),
            article.title
        );
        let label = format!("summarize {}", article.url);
        retry_with_backoff(&self.config.retry, &label, || self.summarizer.summarize(&request)).await
    }

    fn fail(
        &self,
        mut record: ProcessedRecord,
        document: Option<IndexDocument>,
        stage: EnrichmentStage,
        error: IndexerError,
    ) -> EnrichedArticle {
        warn!("Enrichment failed at {} for {}: {}", stage, record.article.url, error);
        record.mark_failed(stage.to_string(), error.to_string());
        let error = IndexerError::Enrichment {
            stage: stage.to_string(),
            reason: error.to_string(),
        };
        EnrichedArticle {
            record,
            document,
            failure: Some((stage, error)),
        }
    }
}
