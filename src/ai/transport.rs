//! # Chat Transport Module
//!
//! The gateway never talks HTTP itself: it goes through the `ChatTransport` trait so
//! tests can inject a scripted transport, and production uses `OpenRouterTransport`,
//! which speaks the OpenAI-compatible chat-completion format of https://openrouter.ai.
//!
//! A transport performs exactly one request per call. Retries, backoff, timeouts and
//! model fallback belong to the gateway.

use crate::ai::error::AiError;
use crate::ai::types::{CompletionRequest, CompletionResponse, ProviderErrorBody};
use crate::settings::{AiSettings, ConfigError};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use url::Url;

/// HTTP client trait for dependency injection
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends one completion request and returns the text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError>;

    /// false when the transport is known to be unusable (e.g. no API key)
    fn is_configured(&self) -> bool {
        true
    }
}

pub struct OpenRouterTransport {
    client: Client,
    api_key: Option<String>,
    completions_url: Url,
    key_url: Url,
    referer: String,
    title: String,
}

impl OpenRouterTransport {
    pub fn new(settings: &AiSettings) -> Result<Self, ConfigError> {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: &AiSettings) -> Result<Self, ConfigError> {
        let base_url = settings.base_url()?;
        Ok(Self {
            client,
            api_key: settings.api_key().map(str::to_string),
            completions_url: base_url.join("chat/completions")?,
            key_url: base_url.join("auth/key")?,
            referer: settings.referer.clone(),
            title: settings.title.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, AiError> {
        self.api_key.as_deref().ok_or(AiError::MissingApiKey)
    }

    /// Asks the provider to describe the configured key. Succeeds only for a valid key.
    pub async fn check_key(&self) -> Result<serde_json::Value, AiError> {
        let response = self
            .client
            .get(self.key_url.clone())
            .bearer_auth(self.api_key()?)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Key check failed with {}: {}", status, provider_message(&body));
            return Err(AiError::from_status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatTransport for OpenRouterTransport {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let api_key = self.api_key()?;
        debug!("POST {} model={}", self.completions_url, request.model);
        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "OpenRouter returned {} for model {}: {}",
                status,
                request.model,
                provider_message(&body)
            );
            return Err(AiError::from_status(status.as_u16()));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;
        body.first_content()
            .ok_or_else(|| AiError::MalformedResponse("completion has no content".to_string()))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Short description of a provider error body for the logs.
pub fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.chars().take(200).collect(),
    }
}
