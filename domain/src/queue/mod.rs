//! Task merge store.
//!
//! [`log_queue::LogQueue`] maps each task id to its accumulated record. Partial
//! writes for an existing task merge into the entry instead of replacing it,
//! which is how streamed outputs are reassembled before shipping.

pub mod entities;
pub mod log_queue;
