//! Best-effort metadata extraction.
//!
//! Nothing here is required for correctness: fields that cannot be found stay
//! `None` and are left out of the serialized record.

use crate::record::value_objects::Usage;
use serde_json::Value;

/// Metadata annotating a log record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub usage: Option<Usage>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.usage.is_none() && self.model.is_none() && self.system_prompt.is_none()
    }
}

/// Extract metadata from a task's input and (optional) output.
pub fn extract_metadata(input: &Value, output: Option<&Value>) -> Metadata {
    Metadata {
        usage: output.and_then(extract_usage),
        model: output
            .and_then(extract_model)
            .or_else(|| extract_model(input)),
        system_prompt: extract_system_prompt(input),
    }
}

/// `usage` object of a completion, or a synthetic one-token count for a
/// streamed chunk.
pub fn extract_usage(output: &Value) -> Option<Usage> {
    if let Some(usage) = output.get("usage").and_then(Usage::from_value) {
        return Some(usage);
    }
    if is_stream_chunk(output) {
        return Some(Usage::streamed_chunk());
    }
    None
}

pub fn extract_model(payload: &Value) -> Option<String> {
    payload
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// First message when its role is `system`, else a top-level `system` string.
pub fn extract_system_prompt(input: &Value) -> Option<String> {
    let from_messages = input
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.first())
        .filter(|first| first.get("role").and_then(Value::as_str) == Some("system"))
        .and_then(|first| first.get("content"))
        .and_then(Value::as_str);

    from_messages
        .or_else(|| input.get("system").and_then(Value::as_str))
        .map(str::to_string)
}

fn is_stream_chunk(output: &Value) -> bool {
    output
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .is_some_and(|choice| choice.get("delta").is_some())
}
