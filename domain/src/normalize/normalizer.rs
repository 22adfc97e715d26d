//! Normalizer applying caller-supplied extraction functions.

use super::heuristics::{detect_str_from_input, detect_str_from_output};
use serde_json::Value;
use std::sync::Arc;

/// Error returned by a caller-supplied extraction function.
pub type ExtractionError = Box<dyn std::error::Error + Send + Sync>;

/// Caller-supplied conversion from a raw value to its logged string.
pub type ToStrFn = Arc<dyn Fn(&Value) -> Result<String, ExtractionError> + Send + Sync>;

/// Result of normalizing one input/output pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub input_to_log: String,
    pub raw_input_to_log: Value,
    /// `None` when the output is absent or null (stream completion sentinel).
    pub output_to_log: Option<String>,
    pub raw_output_to_log: Option<Value>,
}

/// Converts input/output values into their logged forms.
///
/// Strings are used verbatim. Other values go through the configured
/// extraction function, or the default heuristics when none is set.
#[derive(Clone, Default)]
pub struct Normalizer {
    input_to_str: Option<ToStrFn>,
    output_to_str: Option<ToStrFn>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_to_str(mut self, f: ToStrFn) -> Self {
        self.input_to_str = Some(f);
        self
    }

    pub fn with_output_to_str(mut self, f: ToStrFn) -> Self {
        self.output_to_str = Some(f);
        self
    }

    /// Normalize an input/output pair.
    ///
    /// `raw_input` / `raw_output` override the raw values stored on the record
    /// (a `null` override counts as absent). Errors from caller extraction
    /// functions are returned as-is.
    pub fn normalize(
        &self,
        input: &Value,
        output: Option<&Value>,
        raw_input: Option<&Value>,
        raw_output: Option<&Value>,
    ) -> Result<Normalized, ExtractionError> {
        let input_to_log = match (input, &self.input_to_str) {
            (Value::String(s), _) => s.clone(),
            (other, Some(f)) => f(other)?,
            (other, None) => detect_str_from_input(other),
        };

        let output = output.filter(|value| !value.is_null());
        let output_to_log = match (output, &self.output_to_str) {
            (None, _) => None,
            (Some(Value::String(s)), _) => Some(s.clone()),
            (Some(other), Some(f)) => Some(f(other)?),
            (Some(other), None) => Some(detect_str_from_output(other)),
        };

        Ok(Normalized {
            input_to_log,
            raw_input_to_log: non_null(raw_input).unwrap_or(input).clone(),
            output_to_log,
            raw_output_to_log: non_null(raw_output).or(output).cloned(),
        })
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("input_to_str", &self.input_to_str.is_some())
            .field("output_to_str", &self.output_to_str.is_some())
            .finish()
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_used_verbatim() {
        let n = Normalizer::new()
            .normalize(&json!("question"), Some(&json!("answer")), None, None)
            .unwrap();
        assert_eq!(n.input_to_log, "question");
        assert_eq!(n.output_to_log.as_deref(), Some("answer"));
        assert_eq!(n.raw_input_to_log, json!("question"));
        assert_eq!(n.raw_output_to_log, Some(json!("answer")));
    }

    #[test]
    fn normalization_is_idempotent() {
        let normalizer = Normalizer::new();
        let input = json!({"messages": [{"role": "user", "content": "Hi"}]});
        let output = json!({"choices": [{"message": {"content": "Hello"}}]});

        let first = normalizer.normalize(&input, Some(&output), None, None).unwrap();
        let second = normalizer.normalize(&input, Some(&output), None, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.input_to_log, "Hi");
        assert_eq!(first.output_to_log.as_deref(), Some("Hello"));
    }

    #[test]
    fn absent_and_null_output_normalize_to_none() {
        let normalizer = Normalizer::new();
        let absent = normalizer.normalize(&json!("q"), None, None, None).unwrap();
        let null = normalizer
            .normalize(&json!("q"), Some(&Value::Null), None, None)
            .unwrap();
        assert_eq!(absent.output_to_log, None);
        assert_eq!(absent.raw_output_to_log, None);
        assert_eq!(null, absent);
    }

    #[test]
    fn raw_overrides_replace_original_values() {
        let n = Normalizer::new()
            .normalize(
                &json!("q"),
                Some(&json!("a")),
                Some(&json!({"full": "query"})),
                Some(&json!({"full": "answer"})),
            )
            .unwrap();
        assert_eq!(n.raw_input_to_log, json!({"full": "query"}));
        assert_eq!(n.raw_output_to_log, Some(json!({"full": "answer"})));
        assert_eq!(n.input_to_log, "q");
    }

    #[test]
    fn custom_extraction_functions_apply_to_non_strings() {
        let normalizer = Normalizer::new()
            .with_input_to_str(Arc::new(|v: &Value| -> Result<String, ExtractionError> {
                Ok(format!("in:{}", v["q"]))
            }))
            .with_output_to_str(Arc::new(|v: &Value| -> Result<String, ExtractionError> {
                Ok(format!("out:{}", v["a"]))
            }));

        let n = normalizer
            .normalize(&json!({"q": 1}), Some(&json!({"a": 2})), None, None)
            .unwrap();
        assert_eq!(n.input_to_log, "in:1");
        assert_eq!(n.output_to_log.as_deref(), Some("out:2"));

        // Strings bypass the custom functions
        let n = normalizer
            .normalize(&json!("q"), Some(&json!("a")), None, None)
            .unwrap();
        assert_eq!(n.input_to_log, "q");
    }

    #[test]
    fn custom_extraction_errors_propagate() {
        let normalizer = Normalizer::new().with_output_to_str(Arc::new(
            |_: &Value| -> Result<String, ExtractionError> { Err("bad output shape".into()) },
        ));

        let err = normalizer
            .normalize(&json!("q"), Some(&json!({"a": 1})), None, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "bad output shape");
    }
}
