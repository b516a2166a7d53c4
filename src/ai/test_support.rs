use crate::ai::error::AiError;
use crate::ai::gateway::{AiGateway, ModelPolicy};
use crate::ai::transport::ChatTransport;
use crate::ai::types::{CompletionRequest, TaskProfiles};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Responder = dyn Fn(&CompletionRequest, usize) -> Result<String, AiError> + Send + Sync;

/// Transport answering from a closure and recording every request it receives.
pub(crate) struct ScriptedTransport {
    responder: Box<Responder>,
    calls: Mutex<Vec<CompletionRequest>>,
    configured: bool,
}

impl ScriptedTransport {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest, usize) -> Result<String, AiError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            configured: true,
        }
    }

    pub(crate) fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(text.clone()))
    }

    pub(crate) fn failing(error: AiError) -> Self {
        Self::new(move |_, _| Err(error.clone()))
    }

    pub(crate) fn unconfigured() -> Self {
        let mut transport = Self::failing(AiError::MissingApiKey);
        transport.configured = false;
        transport
    }

    pub(crate) fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn models_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|request| request.model).collect()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len() - 1
        };
        (self.responder)(request, index)
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// two models, three attempts each, no backoff delay
pub(crate) fn fast_policy() -> ModelPolicy {
    ModelPolicy {
        models: vec!["primary/model".to_string(), "fallback/model".to_string()],
        attempts_per_model: 3,
        base_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
    }
}

pub(crate) fn gateway_with(transport: Arc<ScriptedTransport>) -> AiGateway {
    AiGateway::new(transport, fast_policy(), TaskProfiles::default())
}
