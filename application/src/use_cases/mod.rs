//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatcher;
pub mod feedback;
pub(crate) mod shared;
pub mod stream_tap;
pub mod task_logger;
