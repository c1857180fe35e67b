use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed to read: its URL plus an optional human label used as the source name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub label: Option<String>,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// One feed entry. `url` is the dedup key and is stable across fetches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub author: Option<String>,
    pub source_feed: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Title and summary joined the way keyword matching sees them.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    Pending,
    Indexed,
    Failed { stage: String, reason: String },
}

/// An article after classification and enrichment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub article: Article,
    pub is_relevant: bool,
    pub tags: Vec<String>,
    pub translated_summary: Option<String>,
    pub indexed: bool,
    pub status: RecordStatus,
}

impl ProcessedRecord {
    pub fn new(article: Article, is_relevant: bool) -> Self {
        Self {
            article,
            is_relevant,
            tags: Vec::new(),
            translated_summary: None,
            indexed: false,
            status: RecordStatus::Pending,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn mark_failed(&mut self, stage: impl Into<String>, reason: impl Into<String>) {
        self.indexed = false;
        self.status = RecordStatus::Failed {
            stage: stage.into(),
            reason: reason.into(),
        };
    }

    pub fn mark_indexed(&mut self) {
        self.indexed = true;
        self.status = RecordStatus::Indexed;
    }
}

/// Input to a summarization collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    pub target_language: String,
}

// Object style note:
// Collaborators (summarizer, search index, secret source) are invoked from a
// short lived, single run process. Implementations hold connection settings
// only; everything a run accumulates (seen URLs, counters, sink handle) is
// owned by the pipeline and passed down explicitly.
