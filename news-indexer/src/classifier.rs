use crate::types::{Article, IndexerError, Result};
use chrono::{DateTime, Duration, Utc};

/// A validated, non-empty set of keywords matched case-insensitively.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    lowered: Vec<String>,
}

impl KeywordSet {
    /// Blank entries and duplicates (ignoring case) are dropped. A set left
    /// empty is a configuration error.
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = Vec::new();
        let mut lowered: Vec<String> = Vec::new();

        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() {
                continue;
            }
            let lower = keyword.to_lowercase();
            if lowered.contains(&lower) {
                continue;
            }
            kept.push(keyword.to_string());
            lowered.push(lower);
        }

        if kept.is_empty() {
            return Err(IndexerError::ClassificationConfig(
                "keyword set is empty".to_string(),
            ));
        }

        Ok(Self {
            keywords: kept,
            lowered,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// True when any keyword occurs in the article's title or summary.
    pub fn classify(&self, article: &Article) -> bool {
        let text = article.searchable_text().to_lowercase();
        self.lowered.iter().any(|k| text.contains(k.as_str()))
    }

    /// Every keyword that occurs, in configuration order.
    pub fn matching_keywords(&self, article: &Article) -> Vec<String> {
        let text = article.searchable_text().to_lowercase();
        self.keywords
            .iter()
            .zip(&self.lowered)
            .filter(|(_, lower)| text.contains(lower.as_str()))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }
}

pub fn classify(article: &Article, keywords: &KeywordSet) -> bool {
    keywords.classify(article)
}

/// Publication cutoff. Articles without a timestamp always pass.
#[derive(Debug, Clone, Copy)]
pub struct RecencyWindow {
    cutoff: Option<DateTime<Utc>>,
}

impl RecencyWindow {
    pub fn unbounded() -> Self {
        Self { cutoff: None }
    }

    pub fn since(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff: Some(cutoff),
        }
    }

    pub fn last_days(days: u32) -> Self {
        Self::since(Utc::now() - Duration::days(i64::from(days)))
    }

    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    pub fn is_recent(&self, article: &Article) -> bool {
        match (self.cutoff, article.published_at) {
            (Some(cutoff), Some(published)) => published >= cutoff,
            _ => true,
        }
    }
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}
