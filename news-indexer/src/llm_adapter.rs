use crate::secrets::ServiceCredentials;
use crate::types::{IndexerError, Result, SummaryRequest};
use crate::utils::text::extract_sentences;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_OPENAI_API_VERSION: &str = "2024-12-01-preview";

/// Trait for LLM adapters that translate and summarize article text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Get the name of this LLM adapter
    fn adapter_name(&self) -> String;

    /// Translate the text into the target language if needed, then summarize it
    async fn summarize(&self, request: &SummaryRequest) -> Result<String>;
}

pub fn build_prompt(request: &SummaryRequest) -> String {
    format!(
        "Translate this to {} (if not already), then summarize:\n{}",
        request.target_language, request.text
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Azure OpenAI chat completions over REST.
pub struct AzureOpenAiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_key: String,
    api_version: String,
    temperature: f32,
}

impl AzureOpenAiSummarizer {
    pub fn new(credentials: &ServiceCredentials, api_version: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: credentials.openai_endpoint.trim_end_matches('/').to_string(),
            deployment: credentials.openai_deployment.clone(),
            api_key: credentials.openai_api_key.clone(),
            api_version: api_version.to_string(),
            temperature: 0.3,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl Summarizer for AzureOpenAiSummarizer {
    fn adapter_name(&self) -> String {
        format!("Azure OpenAI ({})", self.deployment)
    }

    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        let prompt = build_prompt(request);
        let body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
        };

        let url = self.completions_url();
        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexerError::HttpStatus {
                url: format!("{}/openai/deployments/{}", self.endpoint, self.deployment),
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| IndexerError::Remote {
                service: "Azure OpenAI".to_string(),
                message: "response contained no content".to_string(),
                transient: false,
            })?;

        debug!("Received {} character summary", content.len());
        Ok(content)
    }
}

/// Mock LLM adapter for dry runs and testing
pub struct MockLlmAdapter {
    name: String,
    response_delay_ms: u64,
    transient_failures: AtomicUsize,
    permanent_failure: bool,
    calls: AtomicUsize,
}

impl MockLlmAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response_delay_ms: 0,
            transient_failures: AtomicUsize::new(0),
            permanent_failure: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    /// Fail the first `count` calls with a retryable error.
    pub fn with_transient_failures(self, count: usize) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Fail every call with a non-retryable error.
    pub fn always_failing(mut self) -> Self {
        self.permanent_failure = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for MockLlmAdapter {
    fn adapter_name(&self) -> String {
        format!("Mock LLM Adapter ({})", self.name)
    }

    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.response_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
        }

        if self.permanent_failure {
            return Err(IndexerError::Remote {
                service: self.adapter_name(),
                message: "model rejected the request".to_string(),
                transient: false,
            });
        }

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(IndexerError::Remote {
                service: self.adapter_name(),
                message: "service busy".to_string(),
                transient: true,
            });
        }

        let summary = extract_sentences(&request.text, 2);
        info!("Mock summary produced ({} chars)", summary.len());
        Ok(format!("[{}] {}", request.target_language, summary))
    }
}
