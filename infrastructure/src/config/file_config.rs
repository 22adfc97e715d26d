//! Raw TOML configuration data types
//!
//! ```toml
//! api_key = "phospho-..."
//! project_id = "my-project"
//! tick_ms = 500
//! base_url = "https://api.phospho.ai/v2"
//! ```

use phospho_application::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TICK};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors found while validating a loaded configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("tick_ms cannot be 0")]
    InvalidTick,

    #[error("base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Complete file configuration (raw TOML structure)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    /// Debounce window of the batch dispatcher, in milliseconds
    pub tick_ms: u64,
    pub base_url: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            tick_ms: DEFAULT_TICK.as_millis() as u64,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("project_id", &self.project_id)
            .field("tick_ms", &self.tick_ms)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.tick_ms == 0 {
            return Err(ConfigValidationError::InvalidTick);
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        Ok(())
    }

    /// Convert to the application-level configuration.
    pub fn into_client_config(self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_tick(Duration::from_millis(self.tick_ms))
            .with_base_url(self.base_url);
        if let Some(api_key) = self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(project_id) = self.project_id {
            config = config.with_project_id(project_id);
        }
        config
    }
}
