//! The accumulated log record of one task.

use super::extensions::Extensions;
use super::value_objects::{RawOutput, Usage, ValueKind};
use crate::task::value_objects::{SessionId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a `batched_log_events` batch.
///
/// Serialized field names follow the collector's wire format, e.g.
/// `created_at` goes out as `client_created_at`. Optional metadata is only
/// emitted when present and extension fields are flattened at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub task_id: TaskId,
    pub session_id: Option<SessionId>,
    pub project_id: String,
    /// Seconds since epoch, truncated.
    #[serde(rename = "client_created_at")]
    pub created_at: i64,

    /// Normalized input.
    pub input: String,
    pub raw_input: Value,
    #[serde(rename = "raw_input_type_name")]
    pub raw_input_kind: ValueKind,

    /// Normalized output, accumulated across streamed writes.
    pub output: Option<String>,
    pub raw_output: RawOutput,
    #[serde(rename = "raw_output_type_name")]
    pub raw_output_kind: ValueKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}
