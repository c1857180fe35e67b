use crate::types::{Article, FeedSource, IndexerError, ParsedFeed, Result};
use feed_rs::parser;
use tracing::{debug, info};

pub struct FeedParser;

impl FeedParser {
    /// Parse an RSS/Atom/JSON feed document into articles attributed to `source`.
    /// Entries without a title or a link are counted in `malformed` and dropped.
    pub fn parse_feed(content: &str, source: &FeedSource) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes) from {}", content.len(), source.url);

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| IndexerError::Parse(format!("Failed to parse feed {}: {}", source.url, e)))?;

        let title = feed
            .title
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty());

        let source_name = source
            .label
            .clone()
            .or_else(|| title.clone())
            .unwrap_or_else(|| source.url.clone());

        let mut articles = Vec::with_capacity(feed.entries.len());
        let mut malformed = 0;

        for entry in feed.entries {
            match Self::parse_entry(entry, &source_name) {
                Some(article) => articles.push(article),
                None => malformed += 1,
            }
        }

        info!(
            "Parsed feed {} with {} entries ({} malformed)",
            source.url,
            articles.len(),
            malformed
        );

        Ok(ParsedFeed {
            title,
            articles,
            malformed,
        })
    }

    fn parse_entry(entry: feed_rs::model::Entry, source_name: &str) -> Option<Article> {
        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty())?;

        // Atom entries may list self, replies or enclosure links ahead of the article.
        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| entry.links.first())?;
        let url = link.href.trim().to_string();
        if url.is_empty() {
            return None;
        }

        // Prefer the short summary; fall back to the full body.
        let summary = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default()
            .trim()
            .to_string();

        let author = entry
            .authors
            .first()
            .map(|a| a.name.trim().to_string())
            .filter(|a| !a.is_empty());

        Some(Article {
            url,
            title,
            summary,
            author,
            source_feed: source_name.to_string(),
            published_at: entry.published.or(entry.updated),
        })
    }
}
