//! Transport port
//!
//! Defines how batches and feedback reach the collector. Adapters (HTTP,
//! JSONL file) live in the infrastructure layer.

use crate::config::Credentials;
use async_trait::async_trait;
use phospho_domain::{FeedbackPayload, LogRecord, TaskId};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the collector
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Collector rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Request body of a batch: `{"batched_log_events": [...]}`
#[derive(Debug, Serialize)]
pub struct BatchBody<'a> {
    pub batched_log_events: &'a [LogRecord],
}

impl<'a> BatchBody<'a> {
    pub fn new(records: &'a [LogRecord]) -> Self {
        Self {
            batched_log_events: records,
        }
    }
}

/// Transport to the collector
///
/// Any error returned from [`send_batch`](Self::send_batch) counts as a failed
/// flush: the dispatcher keeps the batch queued for the next cycle.
#[async_trait]
pub trait LogTransport: Send + Sync {
    /// Ship one batch of ready records.
    async fn send_batch(
        &self,
        credentials: &Credentials,
        records: &[LogRecord],
    ) -> Result<(), TransportError>;

    /// Flag a task as success/failure. Returns the collector's updated task.
    async fn send_feedback(
        &self,
        credentials: &Credentials,
        task_id: &TaskId,
        payload: &FeedbackPayload,
    ) -> Result<Value, TransportError>;
}
