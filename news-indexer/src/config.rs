use crate::defaults::{DEFAULT_FEEDS, DEFAULT_KEYWORDS};
use crate::types::{FeedSource, IndexerError, Result};
use crate::utils::url::is_valid_feed_url;
use std::path::Path;
use tracing::info;

/// Parse a feeds file: one URL per line, optionally followed by whitespace
/// and a label. Blank lines and `#` comments are ignored.
pub fn parse_feed_list(contents: &str) -> Result<Vec<FeedSource>> {
    let mut feeds = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (url, label) = match line.split_once(char::is_whitespace) {
            Some((url, label)) => (url, Some(label.trim())),
            None => (line, None),
        };

        if !is_valid_feed_url(url) {
            return Err(IndexerError::Config(format!(
                "line {}: '{}' is not an http(s) URL",
                index + 1,
                url
            )));
        }

        let mut source = FeedSource::new(url);
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            source = source.with_label(label);
        }
        feeds.push(source);
    }

    Ok(feeds)
}

/// Parse a keywords file: one keyword or phrase per line, `#` comments.
pub fn parse_keyword_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_feeds(path: Option<&Path>) -> Result<Vec<FeedSource>> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                IndexerError::Config(format!("cannot read feeds file {}: {}", path.display(), e))
            })?;
            let feeds = parse_feed_list(&contents)?;
            info!("Loaded {} feeds from {}", feeds.len(), path.display());
            Ok(feeds)
        }
        None => Ok(DEFAULT_FEEDS.iter().map(|url| FeedSource::new(*url)).collect()),
    }
}

pub fn load_keywords(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                IndexerError::Config(format!("cannot read keywords file {}: {}", path.display(), e))
            })?;
            let keywords = parse_keyword_list(&contents);
            info!("Loaded {} keywords from {}", keywords.len(), path.display());
            Ok(keywords)
        }
        None => Ok(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()),
    }
}
