use std::time::Duration;
use thiserror::Error;

/// What the gateway does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// try the same model again after a backoff
    Retry,
    /// give up on this model and move to the next one
    NextModel,
    /// stop immediately, no other model can succeed
    Abort,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiError {
    #[error("AI provider API key is not configured")]
    MissingApiKey,
    #[error("AI provider rejected the API key (HTTP {0})")]
    Unauthorized(u16),
    #[error("AI provider rate limit exceeded")]
    RateLimited,
    #[error("AI model is temporarily unavailable")]
    ServiceUnavailable,
    #[error("AI provider server error (HTTP {0})")]
    Server(u16),
    #[error("AI provider refused the request for this model (HTTP {0})")]
    Rejected(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("AI request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed AI response: {0}")]
    MalformedResponse(String),
    #[error("no AI models are configured")]
    NoModels,
    #[error("all AI models failed, last error: {0}")]
    Exhausted(Box<AiError>),
}

impl AiError {
    /// Maps a non-2xx HTTP status of the provider to an error class.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => AiError::Unauthorized(status),
            429 => AiError::RateLimited,
            503 => AiError::ServiceUnavailable,
            500..=599 => AiError::Server(status),
            _ => AiError::Rejected(status),
        }
    }

    pub fn disposition(&self) -> Disposition {
        match self {
            AiError::MissingApiKey
            | AiError::Unauthorized(_)
            | AiError::NoModels
            | AiError::Exhausted(_) => Disposition::Abort,
            // 402 billing, 404 unknown model, 400 bad request: another model may work
            AiError::Rejected(_) => Disposition::NextModel,
            AiError::RateLimited
            | AiError::ServiceUnavailable
            | AiError::Server(_)
            | AiError::Network(_)
            | AiError::Timeout(_)
            | AiError::MalformedResponse(_) => Disposition::Retry,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AiError::MalformedResponse(e.to_string())
        } else if let Some(status) = e.status() {
            AiError::from_status(status.as_u16())
        } else {
            AiError::Network(e.to_string())
        }
    }
}
