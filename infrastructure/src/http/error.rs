//! Error types for the HTTP transport

use phospho_application::TransportError;
use thiserror::Error;

/// Errors that can occur when talking to the collector over HTTP
#[derive(Error, Debug)]
pub enum HttpTransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Collector returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl From<HttpTransportError> for TransportError {
    fn from(err: HttpTransportError) -> Self {
        match err {
            HttpTransportError::Request(e) if e.is_builder() => TransportError::Other(e.to_string()),
            HttpTransportError::Request(e) => TransportError::ConnectionError(e.to_string()),
            HttpTransportError::Status { status, body } => TransportError::Rejected { status, body },
            HttpTransportError::InvalidBody(e) => TransportError::SerializationError(e.to_string()),
        }
    }
}
