//! Default string extraction.
//!
//! Neither function fails: unknown shapes fall back to the full JSON text.

use serde_json::Value;

/// Generic string conversion. Strings are returned verbatim (no quotes),
/// everything else as JSON text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract a string from a task input.
///
/// A chat-style payload (`{"messages": [...]}`) yields the content of the last
/// message.
pub fn detect_str_from_input(input: &Value) -> String {
    if let Some(content) = input
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.last())
        .and_then(|last| last.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
    {
        return content.to_string();
    }

    value_to_string(input)
}

/// Extract a string from a task output.
///
/// Recognizes a chat completion (`choices[0].message.content`) and a streamed
/// chunk (`choices[0].delta.content`). A chunk without content but carrying a
/// `finish_reason` marks the end of generation and yields an empty string.
pub fn detect_str_from_output(output: &Value) -> String {
    let Some(choice) = output
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
    else {
        return value_to_string(output);
    };

    if let Some(content) = choice.get("message").and_then(|m| m.get("content")) {
        return match content {
            Value::Null => String::new(),
            other => value_to_string(other),
        };
    }

    if let Some(delta) = choice.get("delta") {
        match delta.get("content") {
            Some(Value::Null) | None => {
                if choice.get("finish_reason").is_some() {
                    return String::new();
                }
            }
            Some(content) => return value_to_string(content),
        }
    }

    value_to_string(output)
}
