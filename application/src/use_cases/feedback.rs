//! Submit Feedback use case
//!
//! Flags a dispatched task as success or failure. Independent of the log
//! queue: one network call per request.

use crate::config::Credentials;
use crate::ports::transport::LogTransport;
use phospho_domain::{FeedbackPayload, Flag, FlagClassifier, TaskId, classify_raw_flag};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Input for the SubmitFeedback use case
#[derive(Clone, Default)]
pub struct FeedbackRequest {
    pub task_id: Option<TaskId>,
    /// Explicit flag; wins over `raw_flag`.
    pub flag: Option<Flag>,
    /// Free-form flag (emoji, thumbs...), classified into a [`Flag`].
    pub raw_flag: Option<String>,
    /// Classifier for `raw_flag`; [`classify_raw_flag`] when unset.
    pub raw_flag_to_flag: Option<FlagClassifier>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

impl FeedbackRequest {
    pub fn new(task_id: impl Into<TaskId>) -> Self {
        Self {
            task_id: Some(task_id.into()),
            ..Self::default()
        }
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flag = Some(flag);
        self
    }

    pub fn with_raw_flag(mut self, raw_flag: impl Into<String>) -> Self {
        self.raw_flag = Some(raw_flag.into());
        self
    }

    pub fn with_classifier(mut self, classifier: FlagClassifier) -> Self {
        self.raw_flag_to_flag = Some(classifier);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The flag to submit, if one can be derived.
    pub fn resolve_flag(&self) -> Option<Flag> {
        if let Some(flag) = self.flag {
            return Some(flag);
        }
        let raw = self.raw_flag.as_deref()?;
        Some(match &self.raw_flag_to_flag {
            Some(classify) => classify(raw),
            None => classify_raw_flag(raw),
        })
    }
}

impl std::fmt::Debug for FeedbackRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackRequest")
            .field("task_id", &self.task_id)
            .field("flag", &self.flag)
            .field("raw_flag", &self.raw_flag)
            .field("raw_flag_to_flag", &self.raw_flag_to_flag.is_some())
            .field("notes", &self.notes)
            .field("source", &self.source)
            .finish()
    }
}

/// Use case for flagging a task
pub struct SubmitFeedbackUseCase {
    transport: Arc<dyn LogTransport>,
}

impl SubmitFeedbackUseCase {
    pub fn new(transport: Arc<dyn LogTransport>) -> Self {
        Self { transport }
    }

    /// Submit feedback for a task.
    ///
    /// Never fails: a missing task id or flag, or a transport failure, is
    /// logged as a warning and resolves to `None`.
    pub async fn execute(
        &self,
        credentials: &Credentials,
        request: FeedbackRequest,
    ) -> Option<Value> {
        let Some(task_id) = request.task_id.clone() else {
            warn!("No task_id provided, feedback not sent");
            return None;
        };
        let Some(flag) = request.resolve_flag() else {
            warn!(task_id = %task_id, "Neither flag nor raw_flag provided, feedback not sent");
            return None;
        };

        let payload = FeedbackPayload {
            flag,
            notes: request.notes,
            source: request.source,
            project_id: credentials.project_id.clone(),
        };

        match self
            .transport
            .send_feedback(credentials, &task_id, &payload)
            .await
        {
            Ok(task) => {
                debug!(task_id = %task_id, flag = %flag, "Feedback submitted");
                Some(task)
            }
            Err(e) => {
                warn!(task_id = %task_id, "Failed to submit feedback: {}", e);
                None
            }
        }
    }
}
