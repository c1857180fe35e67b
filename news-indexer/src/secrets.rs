use crate::types::{IndexerError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

pub const OPENAI_KEY: &str = "AI-OPENAI-KEY";
pub const OPENAI_ENDPOINT: &str = "AI-OPENAI-ENDPOINT";
pub const OPENAI_DEPLOYMENT: &str = "AI-OPENAI-DEPLOYMENT";
pub const SEARCH_KEY: &str = "AI-SEARCH-PRIMARY-KEY";
pub const SEARCH_ENDPOINT: &str = "AI-SEARCH-ENDPOINT";

const KEY_VAULT_API_VERSION: &str = "7.4";

/// Supplies credentials and endpoints by secret name.
#[async_trait]
pub trait SecretSource: Send + Sync {
    fn source_name(&self) -> String;

    /// `Ok(None)` when the secret does not exist.
    async fn get_secret(&self, name: &str) -> Result<Option<String>>;
}

/// Reads secrets from the process environment. Dashes in the secret name
/// become underscores, so `AI-OPENAI-KEY` is read from `AI_OPENAI_KEY`.
pub struct EnvSecretSource;

impl EnvSecretSource {
    pub fn env_name(secret: &str) -> String {
        secret.replace('-', "_")
    }
}

#[async_trait]
impl SecretSource for EnvSecretSource {
    fn source_name(&self) -> String {
        "environment".to_string()
    }

    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        Ok(std::env::var(Self::env_name(name))
            .ok()
            .filter(|v| !v.trim().is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct KeyVaultSecret {
    value: Option<String>,
}

/// Azure Key Vault secrets over REST, authorized with a pre-issued bearer token.
pub struct KeyVaultSecretSource {
    client: reqwest::Client,
    vault_url: String,
    access_token: String,
}

impl KeyVaultSecretSource {
    pub fn new(vault_url: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        if vault_url.trim().is_empty() {
            return Err(IndexerError::Config("key vault URL is empty".to_string()));
        }
        if access_token.trim().is_empty() {
            return Err(IndexerError::Config("key vault access token is empty".to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            vault_url: vault_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }
}

#[async_trait]
impl SecretSource for KeyVaultSecretSource {
    fn source_name(&self) -> String {
        format!("key vault {}", self.vault_url)
    }

    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/secrets/{}?api-version={}",
            self.vault_url, name, KEY_VAULT_API_VERSION
        );
        debug!("Requesting secret {} from {}", name, self.vault_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IndexerError::HttpStatus {
                url: format!("{}/secrets/{}", self.vault_url, name),
                status: status.as_u16(),
            });
        }

        let secret: KeyVaultSecret = response.json().await?;
        Ok(secret.value.filter(|v| !v.trim().is_empty()))
    }
}

/// Everything the collaborators need, resolved once before the run starts.
#[derive(Clone)]
pub struct ServiceCredentials {
    pub openai_api_key: String,
    pub openai_endpoint: String,
    pub openai_deployment: String,
    pub search_api_key: String,
    pub search_endpoint: String,
}

impl std::fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("openai_api_key", &"***")
            .field("openai_endpoint", &self.openai_endpoint)
            .field("openai_deployment", &self.openai_deployment)
            .field("search_api_key", &"***")
            .field("search_endpoint", &self.search_endpoint)
            .finish()
    }
}

impl ServiceCredentials {
    /// Resolve every required secret. All missing names are reported together.
    pub async fn load(source: &dyn SecretSource) -> Result<Self> {
        info!("Loading service credentials from {}", source.source_name());

        let names = [
            OPENAI_KEY,
            OPENAI_ENDPOINT,
            OPENAI_DEPLOYMENT,
            SEARCH_KEY,
            SEARCH_ENDPOINT,
        ];
        let mut values = Vec::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            match source.get_secret(name).await? {
                Some(value) => values.push(value),
                None => {
                    missing.push(name);
                    values.push(String::new());
                }
            }
        }

        if !missing.is_empty() {
            return Err(IndexerError::Config(format!(
                "missing required secrets in {}: {}",
                source.source_name(),
                missing.join(", ")
            )));
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            openai_api_key: next(),
            openai_endpoint: next(),
            openai_deployment: next(),
            search_api_key: next(),
            search_endpoint: next(),
        })
    }
}
