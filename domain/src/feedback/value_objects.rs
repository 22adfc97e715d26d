//! Feedback flags and their classification.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Raw flags classified as [`Flag::Success`] by [`classify_raw_flag`].
pub const POSITIVE_RAW_FLAGS: &[&str] = &["success", "👍", "🙂", "😀"];

/// Outcome of a task as judged by a human or a heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    Success,
    Failure,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Success => "success",
            Flag::Failure => "failure",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Flag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(Flag::Success),
            "failure" => Ok(Flag::Failure),
            _ => Err(DomainError::InvalidFlag(s.to_string())),
        }
    }
}

/// Caller-supplied conversion from a raw flag (emoji, thumbs, free text) to a [`Flag`].
pub type FlagClassifier = Arc<dyn Fn(&str) -> Flag + Send + Sync>;

/// Default classifier: a small fixed set of positive tokens maps to success,
/// everything else to failure.
pub fn classify_raw_flag(raw_flag: &str) -> Flag {
    if POSITIVE_RAW_FLAGS.contains(&raw_flag) {
        Flag::Success
    } else {
        Flag::Failure
    }
}

/// Body of a feedback call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    pub flag: Flag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub project_id: String,
}
