//! Logging infrastructure: structured event files.
//!
//! Provides [`JsonlTransport`], a JSONL file writer that implements the
//! [`LogTransport`](phospho_application::LogTransport) port.

mod jsonl_transport;

pub use jsonl_transport::JsonlTransport;
