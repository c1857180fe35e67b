use crate::secrets::ServiceCredentials;
use crate::types::{IndexerError, ProcessedRecord, Result};
use crate::utils::text::truncate_chars;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_INDEX_NAME: &str = "news-articles-index";
pub const DEFAULT_SEARCH_API_VERSION: &str = "2023-11-01";

/// Document shape uploaded to the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub author: String,
    pub tags: Vec<String>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
    pub source: String,
    pub content: String,
}

impl IndexDocument {
    /// Stable per URL, so re-uploading the same article replaces it.
    pub fn document_id(url: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes()).to_string()
    }

    pub fn from_record(record: &ProcessedRecord, max_content_chars: usize) -> Self {
        let article = &record.article;
        Self {
            id: Self::document_id(&article.url),
            title: article.title.clone(),
            summary: record
                .translated_summary
                .clone()
                .unwrap_or_else(|| article.summary.clone()),
            url: article.url.clone(),
            author: article.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            tags: record.tags.clone(),
            published_date: article.published_at.map(|dt| dt.to_rfc3339()),
            source: article.source_feed.clone(),
            content: truncate_chars(&article.summary, max_content_chars).to_string(),
        }
    }
}

/// Search indexing collaborator. Uploads are idempotent on the document URL.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    fn index_name(&self) -> String;

    async fn upload(&self, document: &IndexDocument) -> Result<()>;
}

#[derive(Serialize)]
struct IndexBatch<'a> {
    value: Vec<IndexAction<'a>>,
}

#[derive(Serialize)]
struct IndexAction<'a> {
    #[serde(rename = "@search.action")]
    action: &'static str,
    #[serde(flatten)]
    document: &'a IndexDocument,
}

#[derive(Debug, Deserialize)]
struct IndexBatchResponse {
    #[serde(default)]
    value: Vec<IndexingResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexingResult {
    key: String,
    status: bool,
    error_message: Option<String>,
    status_code: u16,
}

/// Azure Cognitive Search document upload over REST.
pub struct AzureSearchIndex {
    client: reqwest::Client,
    endpoint: String,
    index_name: String,
    api_key: String,
    api_version: String,
}

impl AzureSearchIndex {
    pub fn new(
        credentials: &ServiceCredentials,
        index_name: &str,
        api_version: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: credentials.search_endpoint.trim_end_matches('/').to_string(),
            index_name: index_name.to_string(),
            api_key: credentials.search_api_key.clone(),
            api_version: api_version.to_string(),
        })
    }
}

#[async_trait]
impl SearchIndex for AzureSearchIndex {
    fn index_name(&self) -> String {
        self.index_name.clone()
    }

    async fn upload(&self, document: &IndexDocument) -> Result<()> {
        let url = format!(
            "{}/indexes/{}/docs/index?api-version={}",
            self.endpoint, self.index_name, self.api_version
        );
        let batch = IndexBatch {
            value: vec![IndexAction {
                action: "mergeOrUpload",
                document,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&batch)
            .send()
            .await?;

        let status = response.status();
        // 207 means some documents in the batch failed; inspect per-item results.
        if !status.is_success() {
            return Err(IndexerError::HttpStatus {
                url: format!("{}/indexes/{}", self.endpoint, self.index_name),
                status: status.as_u16(),
            });
        }

        let results: IndexBatchResponse = response.json().await?;
        if let Some(failed) = results.value.into_iter().find(|r| !r.status) {
            return Err(IndexerError::Remote {
                service: "Azure Search".to_string(),
                message: format!(
                    "document {} rejected ({}): {}",
                    failed.key,
                    failed.status_code,
                    failed.error_message.unwrap_or_default()
                ),
                transient: crate::types::is_retryable_status(failed.status_code),
            });
        }

        info!("Uploaded: {} Status: {}", document.title, status.as_u16());
        Ok(())
    }
}

/// In-process index for dry runs and tests. Documents are replaced by id.
#[derive(Default)]
pub struct MemoryIndex {
    documents: Mutex<Vec<IndexDocument>>,
    transient_failures: AtomicUsize,
    permanent_failure: bool,
    attempts: AtomicUsize,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `count` uploads with a retryable error.
    pub fn with_transient_failures(self, count: usize) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn always_failing(mut self) -> Self {
        self.permanent_failure = true;
        self
    }

    pub fn documents(&self) -> Vec<IndexDocument> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    fn index_name(&self) -> String {
        "memory".to_string()
    }

    async fn upload(&self, document: &IndexDocument) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.permanent_failure {
            return Err(IndexerError::Remote {
                service: "memory index".to_string(),
                message: format!("document {} rejected", document.id),
                transient: false,
            });
        }

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(IndexerError::Remote {
                service: "memory index".to_string(),
                message: "service unavailable".to_string(),
                transient: true,
            });
        }

        let mut docs = self
            .documents
            .lock()
            .map_err(|_| IndexerError::General("memory index lock poisoned".to_string()))?;
        docs.retain(|d| d.id != document.id);
        docs.push(document.clone());
        debug!("Stored {} in memory index ({} documents)", document.url, docs.len());
        Ok(())
    }
}
