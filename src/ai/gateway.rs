//! # AI Gateway Module
//!
//! ## Aim
//! Single entry point for all calls to the external language model. Reaction analysis,
//! element explanations and the assistant chat share the same control flow and differ
//! only in prompt and `TaskProfile`.
//!
//! ## Fallback policy
//! `ModelPolicy` holds the ordered model list. For each model the gateway makes up to
//! `attempts_per_model` attempts, sleeping `base_delay * 2^n` between attempts on the same
//! model. Each attempt is bounded by `request_timeout`. What happens after a failure
//! depends on `AiError::disposition`:
//! - `Retry`: rate limits, 5xx, network errors, timeouts, empty or undecodable bodies
//! - `NextModel`: the provider refused this model (402, 404, other 4xx)
//! - `Abort`: missing or rejected credentials; no other model can succeed
//!
//! When every model fails the caller receives `AiError::Exhausted` holding the last error.
//!
//! Structured tasks go through `complete_parsed`: the reply is decoded inside the attempt,
//! so a reply without a readable JSON object counts as `MalformedResponse` and is retried
//! like any other transient failure.

use crate::ai::error::{AiError, Disposition};
use crate::ai::json_extract::extract_json_object;
use crate::ai::prompts;
use crate::ai::transport::ChatTransport;
use crate::ai::types::{ChatMessage, CompletionRequest, TaskProfile, TaskProfiles};
use crate::chemistry::elements::Element;
use crate::settings::AiSettings;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelPolicy {
    pub models: Vec<String>,
    pub attempts_per_model: u32,
    pub base_delay: Duration,
    pub request_timeout: Duration,
}

impl ModelPolicy {
    /// delay before retry number `retry` (0-based) on the same model
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry))
    }
}

impl From<&AiSettings> for ModelPolicy {
    fn from(settings: &AiSettings) -> Self {
        Self {
            models: settings.models.clone(),
            attempts_per_model: settings.attempts_per_model.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }
}

pub struct AiGateway {
    transport: Arc<dyn ChatTransport>,
    policy: ModelPolicy,
    profiles: TaskProfiles,
}

impl AiGateway {
    pub fn new(transport: Arc<dyn ChatTransport>, policy: ModelPolicy, profiles: TaskProfiles) -> Self {
        Self {
            transport,
            policy,
            profiles,
        }
    }

    pub fn policy(&self) -> &ModelPolicy {
        &self.policy
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }

    /// Completion with the configured model preference list.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        profile: TaskProfile,
    ) -> Result<String, AiError> {
        self.complete_with(messages, &self.policy.models, profile)
            .await
    }

    /// Completion walking `models` in order.
    pub async fn complete_with(
        &self,
        messages: &[ChatMessage],
        models: &[String],
        profile: TaskProfile,
    ) -> Result<String, AiError> {
        self.complete_decoded(messages, models, profile, |text| Ok(text.to_string()))
            .await
    }

    /// Completion whose reply must hold a JSON object of shape `T`. Unreadable replies
    /// are retried under the same policy as transport failures.
    pub async fn complete_parsed<T: DeserializeOwned>(
        &self,
        messages: &[ChatMessage],
        profile: TaskProfile,
    ) -> Result<T, AiError> {
        self.complete_decoded(messages, &self.policy.models, profile, |text| {
            extract_json_object(text).map_err(|e| AiError::MalformedResponse(e.to_string()))
        })
        .await
    }

    async fn complete_decoded<T, F>(
        &self,
        messages: &[ChatMessage],
        models: &[String],
        profile: TaskProfile,
        decode: F,
    ) -> Result<T, AiError>
    where
        F: Fn(&str) -> Result<T, AiError>,
    {
        if models.is_empty() {
            return Err(AiError::NoModels);
        }
        let attempts = self.policy.attempts_per_model.max(1);
        let mut last_error = AiError::NoModels;

        for model in models {
            let request = CompletionRequest::new(model, messages, profile);
            for attempt in 0..attempts {
                if attempt > 0 {
                    let delay = self.policy.backoff_delay(attempt - 1);
                    debug!("Waiting {:?} before retrying {}", delay, model);
                    tokio::time::sleep(delay).await;
                }
                info!(
                    "Requesting completion from {} (attempt {}/{})",
                    model,
                    attempt + 1,
                    attempts
                );
                match self.attempt(&request).await.and_then(|text| decode(&text)) {
                    Ok(value) => {
                        info!("Completion received from {}", model);
                        return Ok(value);
                    }
                    Err(err) => {
                        warn!("Model {} attempt {} failed: {}", model, attempt + 1, err);
                        match err.disposition() {
                            Disposition::Abort => return Err(err),
                            Disposition::NextModel => {
                                last_error = err;
                                break;
                            }
                            Disposition::Retry => last_error = err,
                        }
                    }
                }
            }
        }

        error!("All models and retries exhausted, last error: {}", last_error);
        Err(AiError::Exhausted(Box::new(last_error)))
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let timeout = self.policy.request_timeout;
        match tokio::time::timeout(timeout, self.transport.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout(timeout)),
        }
    }

    /// `elements` are display labels, e.g. "Na (Sodium)". The reply is decoded into `T`.
    pub async fn analyze_reaction<T: DeserializeOwned>(&self, elements: &[String]) -> Result<T, AiError> {
        self.complete_parsed(
            &prompts::reaction_analysis(elements),
            self.profiles.reaction_analysis,
        )
        .await
    }

    pub async fn explain_element(&self, element: &Element) -> Result<String, AiError> {
        self.complete(
            &prompts::element_explanation(&element.symbol, &element.name),
            self.profiles.element_explanation,
        )
        .await
    }

    pub async fn assistant_chat(&self, question: &str) -> Result<String, AiError> {
        self.complete(
            &prompts::assistant_chat(question),
            self.profiles.assistant_chat,
        )
        .await
    }
}
