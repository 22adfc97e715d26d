//! Log records - the canonical shape shipped to the collector.
//!
//! - [`entities::LogRecord`] - one accumulated task record
//! - [`value_objects::RawOutput`] - a single raw output or folded stream fragments
//! - [`value_objects::ValueKind`] - type tag stored next to raw values
//! - [`value_objects::Usage`] - token usage figures
//! - [`extensions::Extensions`] - caller-supplied extra fields

pub mod entities;
pub mod extensions;
pub mod value_objects;
