//! Caller-supplied extension fields.
//!
//! Extension fields are flattened into the record on the wire. Names that
//! collide with a reserved record field are rejected on insert, so caller data
//! can never overwrite `task_id`, `output`, etc.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Wire names owned by [`LogRecord`](super::entities::LogRecord).
pub const RESERVED_FIELDS: &[&str] = &[
    "task_id",
    "session_id",
    "project_id",
    "client_created_at",
    "input",
    "raw_input",
    "raw_input_type_name",
    "output",
    "raw_output",
    "raw_output_type_name",
    "usage",
    "model",
    "system_prompt",
];

/// Returns true if `name` is owned by the record itself.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// Extra key/value pairs attached to a record (e.g. `flag`, `metadata`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<String, Value>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs, failing on the first reserved name.
    pub fn from_pairs<K, I>(pairs: I) -> Result<Self, DomainError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut extensions = Self::new();
        for (key, value) in pairs {
            extensions.insert(key, value)?;
        }
        Ok(extensions)
    }

    /// Insert a field, replacing any previous value under the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), DomainError> {
        let key = key.into();
        if is_reserved(&key) {
            return Err(DomainError::ReservedField(key));
        }
        self.0.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Overlay `newer` on top of `self`; fields present in both take the newer value.
    pub fn overlay(mut self, newer: Extensions) -> Self {
        self.0.extend(newer.0);
        self
    }
}
