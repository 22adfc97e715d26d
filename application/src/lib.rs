//! Application layer for phospho-rs
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ClientConfig, Credentials, CredentialsError, DEFAULT_BASE_URL, DEFAULT_TICK};
pub use ports::transport::{BatchBody, LogTransport, TransportError};
pub use use_cases::dispatcher::{BatchDispatcher, FlushOutcome};
pub use use_cases::feedback::{FeedbackRequest, SubmitFeedbackUseCase};
pub use use_cases::stream_tap::{OkOnly, TapSink, TappedIter, TappedStream};
pub use use_cases::task_logger::{ClientError, LogRequest, StreamWriter, TaskLogger};
