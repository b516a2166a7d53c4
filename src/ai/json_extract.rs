use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("valid fenced block regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoJsonObject,
    #[error("JSON object does not have the expected shape: {0}")]
    Invalid(String),
}

/// Extracts the first JSON object from model output and deserializes it into `T`.
/// A fenced code block is preferred when one holds an object; otherwise the text is
/// scanned for the first `{` from which a complete object parses.
pub fn extract_json_object<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let value = find_json_object(text).ok_or(ExtractError::NoJsonObject)?;
    serde_json::from_value(value).map_err(|e| ExtractError::Invalid(e.to_string()))
}

pub fn find_json_object(text: &str) -> Option<Value> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|block| first_object(block.as_str()))
        .or_else(|| first_object(text))
}

fn first_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(start, _)| {
        // parses one value and ignores whatever trails it
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value @ Value::Object(_))) => Some(value),
            _ => None,
        }
    })
}
