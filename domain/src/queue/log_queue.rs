//! Ordered task-id → entry store with merge semantics.

use super::entities::{QueueEntry, ReadyBatch, TaskWrite};
use crate::record::entities::LogRecord;
use crate::record::value_objects::{RawOutput, ValueKind};
use crate::task::value_objects::TaskId;
use indexmap::IndexMap;

/// Queue of log entries keyed by task id, in first-write order.
///
/// Invariant: at most one entry per task id. Entries are only removed by
/// [`remove_shipped`](Self::remove_shipped); there is no expiry, so a task
/// whose stream is abandoned before completion stays queued and not ready.
#[derive(Debug, Clone, Default)]
pub struct LogQueue {
    entries: IndexMap<TaskId, QueueEntry>,
}

impl LogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&QueueEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.values()
    }

    /// Merge a write into the queue and return the resulting record.
    ///
    /// Against an existing entry:
    /// - string outputs concatenate (existing + new)
    /// - an absent new output (completion sentinel) keeps the existing output
    /// - raw outputs fold into fragments, or are replaced when
    ///   `concatenate_raw_outputs` is off; a write without raw output keeps
    ///   the existing one
    /// - usage figures add up, other metadata keeps the existing value when
    ///   the new write has none
    ///
    /// Readiness is taken from the write itself.
    pub fn merge(&mut self, write: TaskWrite) -> LogRecord {
        let TaskWrite {
            task_id,
            session_id,
            project_id,
            created_at,
            normalized,
            metadata,
            extensions,
            concatenate_raw_outputs,
            is_terminal,
        } = write;

        let mut record = LogRecord {
            task_id: task_id.clone(),
            session_id,
            project_id,
            created_at,
            raw_input_kind: ValueKind::of(&normalized.raw_input_to_log),
            input: normalized.input_to_log,
            raw_input: normalized.raw_input_to_log,
            output: normalized.output_to_log,
            raw_output: RawOutput::empty(),
            raw_output_kind: ValueKind::Null,
            usage: metadata.usage,
            model: metadata.model,
            system_prompt: metadata.system_prompt,
            extensions,
        };
        let new_raw = normalized.raw_output_to_log;

        match self.entries.get(&task_id) {
            Some(existing) => {
                let previous = &existing.content;

                record.output = match (previous.output.clone(), record.output) {
                    (Some(old), Some(new)) => Some(old + &new),
                    (old, new) => new.or(old),
                };

                record.raw_output = match new_raw {
                    None => previous.raw_output.clone(),
                    Some(raw) if concatenate_raw_outputs => previous.raw_output.clone().fold(raw),
                    Some(raw) => RawOutput::Single(raw),
                };

                record.usage = match (previous.usage, record.usage) {
                    (Some(old), Some(new)) => Some(old + new),
                    (old, new) => new.or(old),
                };
                record.model = record.model.or_else(|| previous.model.clone());
                record.system_prompt = record
                    .system_prompt
                    .or_else(|| previous.system_prompt.clone());
                record.extensions = previous.extensions.clone().overlay(record.extensions);
            }
            None => {
                record.raw_output = RawOutput::from(new_raw);
            }
        }
        record.raw_output_kind = record.raw_output.kind();

        self.entries.insert(
            task_id.clone(),
            QueueEntry {
                id: task_id,
                content: record.clone(),
                ready_to_ship: is_terminal,
            },
        );

        record
    }

    /// Snapshot the entries that are ready to ship, in queue order.
    ///
    /// Returns `None` when no entry is ready; not-ready entries are never part
    /// of a batch and stay queued.
    pub fn ready_batch(&self) -> Option<ReadyBatch> {
        let (ids, records): (Vec<_>, Vec<_>) = self
            .entries
            .values()
            .filter(|entry| entry.ready_to_ship)
            .map(|entry| (entry.id.clone(), entry.content.clone()))
            .unzip();

        if ids.is_empty() {
            None
        } else {
            Some(ReadyBatch { ids, records })
        }
    }

    /// Remove shipped entries by id, returning how many were removed.
    ///
    /// Entries are removed even if they were merged into after the snapshot
    /// was taken; a later write to the same id starts a fresh entry.
    pub fn remove_shipped(&mut self, ids: &[TaskId]) -> usize {
        ids.iter()
            .filter(|id| self.entries.shift_remove(*id).is_some())
            .count()
    }
}
