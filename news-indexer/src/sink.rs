use crate::types::{IndexerError, ProcessedRecord, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SINK_FILE_PREFIX: &str = "news_results_";

const HEADERS: [&str; 10] = [
    "title",
    "summary",
    "url",
    "author",
    "tags",
    "published_at",
    "source",
    "is_relevant",
    "translated_summary",
    "indexed",
];

/// One line of the output file. Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkRow {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub author: Option<String>,
    pub tags: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
    pub is_relevant: bool,
    pub translated_summary: Option<String>,
    pub indexed: bool,
}

impl From<&ProcessedRecord> for SinkRow {
    fn from(record: &ProcessedRecord) -> Self {
        let article = &record.article;
        Self {
            title: article.title.clone(),
            summary: article.summary.clone(),
            url: article.url.clone(),
            author: article.author.clone(),
            tags: record.tags.join(", "),
            published_at: article.published_at,
            source: article.source_feed.clone(),
            is_relevant: record.is_relevant,
            translated_summary: record.translated_summary.clone(),
            indexed: record.indexed,
        }
    }
}

pub fn sink_file_name(started: &DateTime<Local>) -> String {
    format!("{}{}.csv", SINK_FILE_PREFIX, started.format("%Y%m%d_%H%M%S"))
}

/// Append-only CSV output. Every row is flushed as soon as it is written so
/// an interrupted run keeps what it already produced.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows_written: usize,
}

impl CsvSink {
    /// Create (or reopen) the timestamped sink file inside `dir`.
    pub fn create(dir: &Path, started: &DateTime<Local>) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| sink_error(dir, e))?;
        Self::open(&dir.join(sink_file_name(started)))
    }

    pub fn open(path: &Path) -> Result<Self> {
        // Devices and pipes never get a header row.
        let is_new = match std::fs::metadata(path) {
            Ok(meta) => meta.is_file() && meta.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| sink_error(path, e))?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(HEADERS).map_err(|e| sink_error(path, e))?;
            writer.flush().map_err(|e| sink_error(path, e))?;
        }

        info!("Writing results to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows_written: 0,
        })
    }

    pub fn append(&mut self, record: &ProcessedRecord) -> Result<()> {
        let row = SinkRow::from(record);
        self.writer
            .serialize(&row)
            .map_err(|e| sink_error(&self.path, e))?;
        self.writer.flush().map_err(|e| sink_error(&self.path, e))?;
        self.rows_written += 1;
        debug!("Wrote sink row for {}", row.url);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

pub fn read_rows(path: &Path) -> Result<Vec<SinkRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows: Vec<SinkRow> = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Pretty-printed JSON of every uploaded document, separated by blank lines.
pub struct UploadLog {
    path: PathBuf,
    file: File,
}

impl UploadLog {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn append<T: Serialize>(&mut self, document: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        write!(self.file, "{}\n\n", json)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn sink_error(path: &Path, e: impl std::fmt::Display) -> IndexerError {
    IndexerError::SinkWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
