//! Infrastructure layer for phospho-rs
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use http::{HttpTransport, HttpTransportError};
pub use logging::JsonlTransport;
