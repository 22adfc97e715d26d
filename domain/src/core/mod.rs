//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - domain-level errors
//! - [`time`] - wall-clock helpers for record timestamps

pub mod error;
pub mod time;
