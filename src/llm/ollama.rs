use crate::config::OllamaConfig;
use crate::error::SummarizeError;
use crate::llm::prompts;
use crate::llm::Summarizer;
use crate::models::{SummarizationRequest, SummarizationResult};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Summarizer backed by a local Ollama server
///
/// One non-streaming `/api/generate` call per request, no retries.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

/// A model installed on the Ollama server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub size_gb: f64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
    #[serde(default)]
    size: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("docsum/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to construct HTTP client for Ollama")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        Self::new(
            &config.url,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> SummarizeError {
        if err.is_timeout() {
            SummarizeError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            SummarizeError::Transport {
                url: url.to_string(),
                detail: error_chain(&err),
            }
        }
    }

    /// Send one prompt and return the trimmed model reply
    pub async fn generate(&self, prompt: &str) -> Result<String, SummarizeError> {
        let url = self.endpoint("/api/generate");
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        if !status.is_success() {
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| SummarizeError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response.trim().to_string())
    }

    /// List the models installed on the server (GET `/api/tags`)
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint("/api/tags");
        let response = self
            .http
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Failed to connect to Ollama at {}", self.base_url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Ollama API at {} returned error: {}",
                self.base_url,
                response.status()
            );
        }

        let tags: TagsResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse model list from {}", self.base_url))?;

        Ok(tags
            .models
            .into_iter()
            .map(|entry| ModelInfo {
                name: entry.name,
                size_gb: (entry.size as f64 / 1_000_000_000.0 * 100.0).round() / 100.0,
            })
            .collect())
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait::async_trait]
impl Summarizer for OllamaClient {
    async fn summarize(&self, request: &SummarizationRequest) -> SummarizationResult {
        if request.content.trim().is_empty() {
            warn!("Empty content provided for summarization");
            return SummarizationResult::success(String::new());
        }

        let prompt = prompts::summary_prompt(request.style, request.max_words, &request.content);
        debug!(
            model = %self.model,
            style = %request.style,
            max_words = request.max_words,
            prompt_chars = prompt.chars().count(),
            "Sending summarization request"
        );

        let started = Instant::now();
        match self.generate(&prompt).await {
            Ok(summary) => {
                info!(
                    model = %self.model,
                    words = summary.split_whitespace().count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generated summary"
                );
                SummarizationResult::success(summary)
            }
            Err(e) => {
                error!(model = %self.model, "Summarization failed: {}", e);
                SummarizationResult::failure(&e)
            }
        }
    }
}
