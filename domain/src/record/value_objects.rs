//! Record value objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Add;

/// Type tag of a raw value, serialized next to it on the wire
/// (`raw_input_type_name` / `raw_output_type_name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
    /// Ordered sequence of raw fragments folded from streamed writes.
    Fragments,
}

impl ValueKind {
    /// Tag for a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Fragments => "fragments",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw output of a task.
///
/// A non-streamed task keeps a single value. Streamed writes to the same task
/// fold into [`RawOutput::Fragments`], one entry per write, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOutput {
    Single(Value),
    Fragments(Vec<Value>),
}

impl RawOutput {
    /// Raw output of a task that has not produced anything yet.
    pub fn empty() -> Self {
        RawOutput::Single(Value::Null)
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        matches!(self, RawOutput::Single(Value::Null))
    }

    /// Append a fragment. An empty raw output simply becomes `next`.
    pub fn fold(self, next: Value) -> Self {
        match self {
            RawOutput::Single(Value::Null) => RawOutput::Single(next),
            RawOutput::Single(first) => RawOutput::Fragments(vec![first, next]),
            RawOutput::Fragments(mut fragments) => {
                fragments.push(next);
                RawOutput::Fragments(fragments)
            }
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            RawOutput::Single(value) => ValueKind::of(value),
            RawOutput::Fragments(_) => ValueKind::Fragments,
        }
    }
}

impl Default for RawOutput {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Option<Value>> for RawOutput {
    fn from(value: Option<Value>) -> Self {
        RawOutput::Single(value.unwrap_or(Value::Null))
    }
}

/// Token usage figures of an LLM call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Synthetic count for one streamed chunk: each chunk carries one token.
    pub fn streamed_chunk() -> Self {
        Self::new(0, 1)
    }

    /// Read a `usage` object. Missing counts default to 0, a missing total is
    /// the sum of the other two. Returns `None` for anything but an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let count = |key: &str| object.get(key).and_then(Value::as_u64);

        let prompt_tokens = count("prompt_tokens").unwrap_or(0);
        let completion_tokens = count("completion_tokens").unwrap_or(0);
        Some(Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: count("total_tokens")
                .unwrap_or_else(|| prompt_tokens.saturating_add(completion_tokens)),
        })
    }
}

impl Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens.saturating_add(rhs.prompt_tokens),
            completion_tokens: self.completion_tokens.saturating_add(rhs.completion_tokens),
            total_tokens: self.total_tokens.saturating_add(rhs.total_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_kind_tags() {
        assert_eq!(ValueKind::of(&json!("a")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!({"a": 1})), ValueKind::Object);
        assert_eq!(ValueKind::of(&json!([1])), ValueKind::Array);
        assert_eq!(serde_json::to_value(ValueKind::Fragments).unwrap(), json!("fragments"));
    }

    #[test]
    fn fold_builds_ordered_fragments() {
        let raw = RawOutput::empty()
            .fold(json!({"a": 1}))
            .fold(json!({"a": 2}))
            .fold(json!({"a": 3}));

        assert_eq!(raw.kind(), ValueKind::Fragments);
        assert_eq!(
            serde_json::to_value(&raw).unwrap(),
            json!([{"a": 1}, {"a": 2}, {"a": 3}])
        );
    }

    #[test]
    fn fold_keeps_array_value_as_single_fragment() {
        let raw = RawOutput::Single(json!([1, 2])).fold(json!(3));
        assert_eq!(raw, RawOutput::Fragments(vec![json!([1, 2]), json!(3)]));
    }

    #[test]
    fn usage_from_value_fills_total() {
        let usage = Usage::from_value(&json!({"prompt_tokens": 10, "completion_tokens": 5})).unwrap();
        assert_eq!(usage.total_tokens, 15);
        assert!(Usage::from_value(&json!("nope")).is_none());
    }

    #[test]
    fn usage_counts_saturate_instead_of_overflowing() {
        let usage =
            Usage::from_value(&json!({"prompt_tokens": u64::MAX, "completion_tokens": 1})).unwrap();
        assert_eq!(usage.total_tokens, u64::MAX);

        let summed = usage + Usage::new(u64::MAX, 1);
        assert_eq!(summed.prompt_tokens, u64::MAX);
        assert_eq!(summed.completion_tokens, 2);
        assert_eq!(Usage::new(u64::MAX, 5).total_tokens, u64::MAX);
    }

    #[test]
    fn usage_adds_componentwise() {
        let total = Usage::streamed_chunk() + Usage::streamed_chunk() + Usage::new(3, 0);
        assert_eq!(total, Usage { prompt_tokens: 3, completion_tokens: 2, total_tokens: 5 });
    }
}
