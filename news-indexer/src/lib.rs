pub mod classifier;
pub mod config;
pub mod dedup;
pub mod defaults;
pub mod enrichment;
pub mod fetcher;
pub mod llm_adapter;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod reader;
pub mod retry;
pub mod search_index;
pub mod secrets;
pub mod sink;
pub mod traits;
pub mod types;
pub mod utils;

pub use types::*;
pub use classifier::{classify, KeywordSet, RecencyWindow};
pub use dedup::{is_new, mark_seen, SeenSet};
pub use enrichment::{EnrichedArticle, Enricher, EnrichmentConfig, EnrichmentStage};
pub use fetcher::Fetcher;
pub use llm_adapter::{AzureOpenAiSummarizer, MockLlmAdapter, Summarizer};
pub use parser::FeedParser;
pub use pipeline::{IndexingPipeline, RunSummary};
pub use reader::{FeedEvent, FeedReader};
pub use search_index::{AzureSearchIndex, IndexDocument, MemoryIndex, SearchIndex};
pub use secrets::{EnvSecretSource, KeyVaultSecretSource, SecretSource, ServiceCredentials};
pub use sink::{CsvSink, SinkRow, UploadLog};
pub use traits::FeedClient;
