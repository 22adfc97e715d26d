//! HTTP transport to the phospho collector.

mod error;
mod transport;

pub use error::HttpTransportError;
pub use transport::HttpTransport;
