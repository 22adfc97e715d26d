//! Client configuration and collector credentials.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default collector base URL (API version included).
pub const DEFAULT_BASE_URL: &str = "https://api.phospho.ai/v2";

/// Default debounce window of the batch dispatcher.
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

/// Errors raised when a call needs credentials that were never configured.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("API key not found. Set `api_key` in the config or the PHOSPHO_API_KEY variable")]
    MissingApiKey,

    #[error("Project id not found. Set `project_id` in the config or the PHOSPHO_PROJECT_ID variable")]
    MissingProjectId,
}

/// Validated pair required by every collector call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub project_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Client configuration.
///
/// Credentials are optional here: a client can be built without them, but
/// every log or feedback call fails with a [`CredentialsError`] until both are
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    /// Quiescence window before queued records are flushed.
    pub tick: Duration,
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            tick: DEFAULT_TICK,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    // ==================== Builder Methods ====================

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Credentials for a collector call. Empty strings count as missing.
    pub fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(CredentialsError::MissingApiKey)?;
        let project_id = self
            .project_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(CredentialsError::MissingProjectId)?;
        Ok(Credentials::new(api_key, project_id))
    }
}
