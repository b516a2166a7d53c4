/// wire types of the chat-completion API and per-task generation settings
pub mod types;
/// classification of AI provider failures
pub mod error;
/// HTTP transport trait for dependency injection and its OpenRouter implementation
pub mod transport;
/// ordered model fallback with per-model retries, backoff and timeouts
///
///  # Examples
/// ```rust, ignore
/// let gateway = AiGateway::new(Arc::new(transport), ModelPolicy::from(&config.ai), config.ai.profiles.clone());
/// let answer = gateway.assistant_chat("Why is water polar?").await?;
/// ```
pub mod gateway;
/// prompt templates of the three AI tasks
pub mod prompts;
/// extraction of the first JSON object from free-form model output
///
///  # Examples
/// ```
/// use chemverse::ai::json_extract::extract_json_object;
/// let text = "Sure! Here you go:\n```json\n{\"feasible\": true}\n```";
/// let value: serde_json::Value = extract_json_object(text).unwrap();
/// assert_eq!(value["feasible"], true);
/// ```
pub mod json_extract;

#[cfg(test)]
pub(crate) mod test_support;
/// tests
mod gateway_tests;
