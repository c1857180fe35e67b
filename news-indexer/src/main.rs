use anyhow::Context;
use chrono::Local;
use clap::{Parser, ValueEnum};
use news_indexer::config::{load_feeds, load_keywords};
use news_indexer::llm_adapter::DEFAULT_OPENAI_API_VERSION;
use news_indexer::search_index::{DEFAULT_INDEX_NAME, DEFAULT_SEARCH_API_VERSION};
use news_indexer::{
    AzureOpenAiSummarizer, AzureSearchIndex, CsvSink, EnrichmentConfig, Enricher, EnvSecretSource,
    FetchConfig, Fetcher, IndexingPipeline, KeyVaultSecretSource, KeywordSet, MemoryIndex,
    MockLlmAdapter, RecencyWindow, RetryConfig, SearchIndex, SecretSource, SeenSet, ServiceCredentials,
    Summarizer, UploadLog,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SecretBackend {
    Env,
    KeyVault,
}

/// Fetch news feeds, keep keyword matches, summarize and index them.
#[derive(Debug, Parser)]
#[command(name = "news-indexer", version)]
struct Cli {
    /// Feeds file: one URL per line, optional label after whitespace
    #[arg(long, env = "NEWS_INDEXER_FEEDS_FILE")]
    feeds_file: Option<PathBuf>,

    /// Keywords file: one keyword or phrase per line
    #[arg(long, env = "NEWS_INDEXER_KEYWORDS_FILE")]
    keywords_file: Option<PathBuf>,

    #[arg(long, env = "NEWS_INDEXER_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    #[arg(long, env = "NEWS_INDEXER_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Skip articles published more than this many days ago (0 disables)
    #[arg(long, default_value_t = 7)]
    max_age_days: u32,

    #[arg(long, default_value_t = 1)]
    fetch_concurrency: usize,

    #[arg(long, default_value_t = 10)]
    timeout_seconds: u64,

    /// Attempts per feed fetch and per collaborator call
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    #[arg(long, default_value_t = 1000)]
    retry_delay_ms: u64,

    #[arg(long, default_value = "English")]
    target_language: String,

    #[arg(long, env = "SEARCH_INDEX_NAME", default_value = DEFAULT_INDEX_NAME)]
    index_name: String,

    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = DEFAULT_OPENAI_API_VERSION)]
    api_version: String,

    #[arg(long, value_enum, default_value = "env")]
    secrets: SecretBackend,

    #[arg(long, env = "KEY_VAULT_URL")]
    key_vault_url: Option<String>,

    #[arg(long, env = "AZURE_KEYVAULT_TOKEN", hide_env_values = true)]
    key_vault_token: Option<String>,

    /// Use the mock summarizer and in-memory index instead of hosted services
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let started = Local::now();

    let log_path = news_indexer::logging::init_tracing(&cli.log_dir, &started)?;
    info!("Starting news indexer (log file {})", log_path.display());

    // Keyword problems are fatal before any feed is fetched.
    let keywords = KeywordSet::new(load_keywords(cli.keywords_file.as_deref())?)
        .context("invalid keyword configuration")?;
    let feeds = load_feeds(cli.feeds_file.as_deref())?;

    let retry = RetryConfig {
        max_attempts: cli.max_attempts,
        initial_delay_ms: cli.retry_delay_ms,
        ..Default::default()
    };
    let timeout = Duration::from_secs(cli.timeout_seconds);

    let (summarizer, index) = build_collaborators(&cli, timeout).await?;
    info!(
        "Using summarizer {} and search index {}",
        summarizer.adapter_name(),
        index.index_name()
    );

    let enricher = Enricher::new(
        summarizer,
        index,
        EnrichmentConfig {
            target_language: cli.target_language.clone(),
            retry: retry.clone(),
            ..Default::default()
        },
    );

    let fetcher = Fetcher::new(FetchConfig {
        timeout_seconds: cli.timeout_seconds,
        retry,
        ..Default::default()
    })?;

    let mut seen = SeenSet::load_from_sink_dir(&cli.output_dir)?;
    let mut sink = CsvSink::create(&cli.output_dir, &started)?;
    let upload_log = UploadLog::open(&cli.output_dir.join("upload.log"))?;

    let recency = if cli.max_age_days == 0 {
        RecencyWindow::unbounded()
    } else {
        RecencyWindow::last_days(cli.max_age_days)
    };

    let mut pipeline = IndexingPipeline::new(Arc::new(fetcher), keywords, enricher)
        .with_recency(recency)
        .with_fetch_concurrency(cli.fetch_concurrency)
        .with_upload_log(upload_log);

    let summary = pipeline.run(feeds, &mut seen, &mut sink).await?;
    summary.log();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("Output saved to: {}", sink.path().display());
    Ok(())
}

async fn build_collaborators(
    cli: &Cli,
    timeout: Duration,
) -> anyhow::Result<(Arc<dyn Summarizer>, Arc<dyn SearchIndex>)> {
    if cli.dry_run {
        warn!("Dry run: summaries are mocked and nothing is uploaded");
        return Ok((
            Arc::new(MockLlmAdapter::new("dry-run")),
            Arc::new(MemoryIndex::new()),
        ));
    }

    let source: Box<dyn SecretSource> = match cli.secrets {
        SecretBackend::Env => Box::new(EnvSecretSource),
        SecretBackend::KeyVault => {
            let vault_url = cli
                .key_vault_url
                .as_deref()
                .context("--key-vault-url (or KEY_VAULT_URL) is required for key vault secrets")?;
            let token = cli
                .key_vault_token
                .as_deref()
                .context("--key-vault-token (or AZURE_KEYVAULT_TOKEN) is required for key vault secrets")?;
            Box::new(KeyVaultSecretSource::new(vault_url, token, timeout)?)
        }
    };

    let credentials = ServiceCredentials::load(source.as_ref())
        .await
        .context("failed to load service credentials")?;

    let summarizer = AzureOpenAiSummarizer::new(&credentials, &cli.api_version, timeout * 6)?;
    let index = AzureSearchIndex::new(&credentials, &cli.index_name, DEFAULT_SEARCH_API_VERSION, timeout)?;
    Ok((Arc::new(summarizer), Arc::new(index)))
}
