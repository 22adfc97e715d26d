//! Domain layer for phospho-rs
//!
//! This crate contains the log record model, value normalization, and the
//! task merge store. It has no dependencies on an async runtime, transports
//! or configuration.
//!
//! # Core Concepts
//!
//! ## Task
//!
//! One logical unit of work (e.g. one LLM call), identified by a [`TaskId`].
//! A task may receive several partial writes when its output is streamed:
//!
//! - **Partial write**: one streamed element, merged into the task's record
//! - **Terminal write**: a non-streamed call, or the completion of a stream;
//!   marks the record ready to ship
//!
//! ## Log queue
//!
//! [`LogQueue`] holds at most one entry per task. String outputs concatenate,
//! raw outputs fold into an ordered fragment sequence.

pub mod core;
pub mod feedback;
pub mod normalize;
pub mod queue;
pub mod record;
pub mod task;

// Re-export commonly used types
pub use core::{error::DomainError, time::unix_seconds};
pub use feedback::value_objects::{
    FeedbackPayload, Flag, FlagClassifier, POSITIVE_RAW_FLAGS, classify_raw_flag,
};
pub use normalize::{
    heuristics::{detect_str_from_input, detect_str_from_output, value_to_string},
    metadata::{Metadata, extract_metadata},
    normalizer::{ExtractionError, Normalized, Normalizer, ToStrFn},
};
pub use queue::{
    entities::{QueueEntry, ReadyBatch, TaskWrite},
    log_queue::LogQueue,
};
pub use record::{
    entities::LogRecord,
    extensions::{Extensions, RESERVED_FIELDS},
    value_objects::{RawOutput, Usage, ValueKind},
};
pub use task::value_objects::{SessionId, TaskId};
