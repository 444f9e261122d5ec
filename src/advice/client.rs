//! HTTP client for the external advice endpoint
//!
//! Sends one chat-completion request per call:
//! - POST `{ model, messages, max_tokens? }` as JSON
//! - reads `choices[0].message.content` from the response
//! - no retries; every failure maps to `AdviceUnavailable`

use crate::advice::prompt::PromptBuilder;
use crate::advice::types::{ChatRequest, ChatResponse};
use crate::bmi::{BmiResult, Measurement};
use crate::errors::{AdvisorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default advice endpoint
pub const DEFAULT_ADVICE_URL: &str = "https://bmiccl-cloud-1.vah03061.workers.dev/";

/// Default model
pub const DEFAULT_MODEL: &str = "glm-4-flash";

/// Default request timeout (60 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can turn a measurement into raw advice text
#[async_trait]
pub trait AdviceSource: Send + Sync {
    /// Fetch raw, unformatted advice text
    async fn fetch_advice(&self, measurement: &Measurement, bmi: &BmiResult) -> Result<String>;
}

/// Chat-completion advice client
#[derive(Debug, Clone)]
pub struct AdviceClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    timeout: Duration,
    prompts: PromptBuilder,
}

impl AdviceClient {
    /// Create advice client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_ADVICE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT)
    }

    /// Create advice client with custom configuration
    pub fn with_config(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AdvisorError::HttpError)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: None,
            max_tokens: None,
            timeout,
            prompts: PromptBuilder::default(),
        })
    }

    /// Send `Authorization: Bearer <key>` with every request
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Request advice for a measurement
    #[instrument(
        name = "advice_client.request",
        skip(self, measurement, bmi),
        fields(model = %self.model, bmi = %bmi.display_value())
    )]
    pub async fn request_advice(
        &self,
        measurement: &Measurement,
        bmi: &BmiResult,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: self.prompts.messages(measurement, bmi),
            max_tokens: self.max_tokens,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(timeout_secs = self.timeout.as_secs(), "advice request timed out");
                AdvisorError::AdviceUnavailable(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                ))
            } else {
                warn!(error = %e, "advice request failed");
                AdvisorError::AdviceUnavailable(format!("Failed to send request: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "advice endpoint returned an error status");
            return Err(AdvisorError::AdviceUnavailable(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            AdvisorError::AdviceUnavailable(format!("Failed to read response: {}", e))
        })?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AdvisorError::AdviceUnavailable(format!("Malformed response: {}", e)))?;

        match parsed.first_content() {
            Some(content) if !content.trim().is_empty() => {
                debug!(chars = content.len(), "advice received");
                Ok(content.to_string())
            }
            _ => Err(AdvisorError::AdviceUnavailable(
                "API returned no advice".to_string(),
            )),
        }
    }
}

#[async_trait]
impl AdviceSource for AdviceClient {
    async fn fetch_advice(&self, measurement: &Measurement, bmi: &BmiResult) -> Result<String> {
        self.request_advice(measurement, bmi).await
    }
}
