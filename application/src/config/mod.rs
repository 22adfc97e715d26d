//! Application-level configuration.
//!
//! - [`ClientConfig`] - credentials, debounce tick and collector URL
//! - [`Credentials`] - validated API key / project id pair

pub mod client_config;

pub use client_config::{
    ClientConfig, Credentials, CredentialsError, DEFAULT_BASE_URL, DEFAULT_TICK,
};
