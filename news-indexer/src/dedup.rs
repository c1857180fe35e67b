use crate::sink::SINK_FILE_PREFIX;
use crate::types::Result;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// URLs already processed, either by an earlier run or earlier in this one.
/// Owned by a single pipeline; there is exactly one writer.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    urls: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect the URLs of every sink file previously written to `dir`.
    /// A missing directory yields an empty set. Rows cut short by an
    /// interrupted run are skipped.
    pub fn load_from_sink_dir(dir: &Path) -> Result<Self> {
        let mut seen = Self::new();
        if !dir.exists() {
            debug!("No output directory at {}, starting with an empty seen set", dir.display());
            return Ok(seen);
        }

        let mut files = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_sink = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(SINK_FILE_PREFIX) && n.ends_with(".csv"))
                .unwrap_or(false);
            if !is_sink {
                continue;
            }
            let skipped = seen.load_sink_file(&path)?;
            if skipped > 0 {
                warn!("Skipped {} incomplete rows in {}", skipped, path.display());
            }
            files += 1;
        }

        info!("Loaded {} seen URLs from {} earlier output files", seen.len(), files);
        Ok(seen)
    }

    /// Returns the number of rows that were skipped.
    fn load_sink_file(&mut self, path: &Path) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let headers = reader.headers()?.clone();
        let Some(url_column) = headers.iter().position(|h| h == "url") else {
            warn!("No url column in {}, ignoring it", path.display());
            return Ok(0);
        };

        let mut skipped = 0;
        for record in reader.records() {
            let record = match record {
                Ok(record) if record.len() == headers.len() => record,
                Ok(_) => {
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    debug!("Unreadable row in {}: {}", path.display(), e);
                    skipped += 1;
                    continue;
                }
            };
            if let Some(url) = record.get(url_column).filter(|u| !u.is_empty()) {
                self.urls.insert(url.to_string());
            }
        }
        Ok(skipped)
    }

    pub fn is_new(&self, url: &str) -> bool {
        !self.urls.contains(url)
    }

    /// Returns true if the URL was not present before.
    pub fn mark_seen(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    /// Check and mark in one step: true only for the first occurrence.
    pub fn check_and_mark(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.mark_seen(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

pub fn is_new(url: &str, seen: &SeenSet) -> bool {
    seen.is_new(url)
}

pub fn mark_seen(url: &str, seen: &mut SeenSet) {
    seen.mark_seen(url);
}
