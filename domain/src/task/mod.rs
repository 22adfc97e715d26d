//! Task and session identifiers.
//!
//! A **task** is one logical unit of work (e.g. one LLM call). A **session**
//! is an optional caller-defined grouping of tasks (e.g. a conversation).

pub mod value_objects;
