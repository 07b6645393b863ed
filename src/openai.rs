//! OpenAI-compatible HTTP embedding provider.
//!
//! Talks to `POST {base_url}/embeddings`. Works against api.openai.com or any
//! server that speaks the same wire format.

use crate::embedding::{Embedding, EmbeddingProvider};
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_MODEL: &str = "OPENAI_EMBEDDING_MODEL";
const ENV_TIMEOUT_SECS: &str = "OPENAI_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    /// Requests fail without sending anything while this is `None`.
    pub api_key: Option<String>,
    /// Whole-request timeout applied by the HTTP client.
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OpenAiConfig {
    /// Reads `OPENAI_*` overrides on top of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        OpenAiConfig {
            base_url: non_empty(ENV_BASE_URL).unwrap_or(defaults.base_url),
            model: non_empty(ENV_MODEL).unwrap_or(defaults.model),
            api_key: non_empty(ENV_API_KEY),
            timeout: non_empty(ENV_TIMEOUT_SECS)
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_embedding(body: &str) -> anyhow::Result<Embedding> {
    let response: EmbeddingResponse =
        serde_json::from_str(body).context("malformed embedding response")?;
    response
        .data
        .into_iter()
        .min_by_key(|data| data.index)
        .map(|data| data.embedding)
        .ok_or_else(|| anyhow!("embedding response contained no data"))
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(response) => response.error.message,
        Err(_) => body.trim().to_string(),
    }
}

pub struct OpenAiEmbeddingProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;
        anyhow::Ok(OpenAiEmbeddingProvider { config, client })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(OpenAiConfig::from_env())
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> anyhow::Result<Embedding> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{} is not set", ENV_API_KEY))?;

        let url = self.config.endpoint();
        log::debug!(
            "requesting embedding from {} with model {}",
            url,
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input: text,
            })
            .send()
            .await
            .with_context(|| format!("embedding request to {} failed", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read embedding response")?;

        if !status.is_success() {
            bail!(
                "embedding request failed with status {}: {}",
                status.as_u16(),
                error_message(&body)
            );
        }

        let embedding = parse_embedding(&body)?;
        log::debug!("received embedding with {} dimensions", embedding.len());
        anyhow::Ok(embedding)
    }
}
