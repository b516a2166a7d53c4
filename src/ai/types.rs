use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generation settings of one AI task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskProfile {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The three tasks sharing the gateway differ only in these settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskProfiles {
    /// low temperature, structured JSON answer
    pub reaction_analysis: TaskProfile,
    /// higher temperature, short answer
    pub element_explanation: TaskProfile,
    /// balanced temperature, long answer
    pub assistant_chat: TaskProfile,
}

impl Default for TaskProfiles {
    fn default() -> Self {
        Self {
            reaction_analysis: TaskProfile {
                temperature: 0.3,
                max_tokens: 1000,
            },
            element_explanation: TaskProfile {
                temperature: 0.8,
                max_tokens: 300,
            },
            assistant_chat: TaskProfile {
                temperature: 0.7,
                max_tokens: 2000,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl CompletionRequest {
    pub fn new(model: &str, messages: &[ChatMessage], profile: TaskProfile) -> Self {
        Self {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// text of the first choice, if it is not blank
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

/// error body returned by the provider on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ProviderErrorDetail {
    pub message: String,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}
