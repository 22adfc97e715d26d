//! Value normalization.
//!
//! Turns arbitrary input/output values into the string forms stored on a
//! [`LogRecord`](crate::record::entities::LogRecord), and extracts optional
//! metadata (usage, model, system prompt) from chat-completion shaped payloads.
//!
//! - [`heuristics`] - default string extraction for inputs and outputs
//! - [`metadata`] - best-effort metadata extraction
//! - [`normalizer::Normalizer`] - applies caller overrides on top of the defaults

pub mod heuristics;
pub mod metadata;
pub mod normalizer;
