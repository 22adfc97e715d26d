//! Configuration file loading for phospho-rs
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PHOSPHO_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./phospho.toml` or `./.phospho.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/phospho/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileConfig};
pub use loader::ConfigLoader;
