//! Queue entities.

use crate::normalize::metadata::Metadata;
use crate::normalize::normalizer::Normalized;
use crate::record::entities::LogRecord;
use crate::record::extensions::Extensions;
use crate::task::value_objects::{SessionId, TaskId};

/// The queued state of one task.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    pub id: TaskId,
    pub content: LogRecord,
    /// Set by terminal writes; only ready entries are shipped.
    pub ready_to_ship: bool,
}

/// One normalized write for a task, ready to be merged.
#[derive(Debug, Clone)]
pub struct TaskWrite {
    pub task_id: TaskId,
    pub session_id: Option<SessionId>,
    pub project_id: String,
    pub created_at: i64,
    pub normalized: Normalized,
    pub metadata: Metadata,
    pub extensions: Extensions,
    /// Fold raw outputs into a fragment sequence instead of replacing them.
    pub concatenate_raw_outputs: bool,
    /// Terminal writes (non-streamed calls, stream completion) mark the entry ready.
    pub is_terminal: bool,
}

/// Snapshot of the ready entries taken at the start of a flush.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadyBatch {
    pub ids: Vec<TaskId>,
    pub records: Vec<LogRecord>,
}

impl ReadyBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
