use crate::types::{IndexerError, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log to stdout and to `<log_dir>/news_indexer_<timestamp>.log`.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_tracing(log_dir: &Path, started: &DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(format!("news_indexer_{}.log", started.format("%Y%m%d_%H%M%S")));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| IndexerError::General(format!("failed to initialise logging: {}", e)))?;

    Ok(path)
}
