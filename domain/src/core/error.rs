//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Field name is reserved by the log record: {0}")]
    ReservedField(String),

    #[error("Invalid flag: {0}")]
    InvalidFlag(String),
}

impl DomainError {
    /// Check if this error was caused by an extension field colliding with a
    /// reserved record field
    pub fn is_reserved_field(&self) -> bool {
        matches!(self, DomainError::ReservedField(_))
    }
}
