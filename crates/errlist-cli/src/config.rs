//! Render config loading for the CLI.

use anyhow::{Context, Result};
use errlist::RenderConfig;
use std::path::{Path, PathBuf};

/// Default location of the user config file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("errlist")
        .join("config.yaml")
}

/// Load configuration from the default path, falling back to defaults
pub fn load_default() -> RenderConfig {
    let config_path = default_config_path();

    if config_path.exists() {
        match load_from(&config_path) {
            Ok(config) => return config,
            Err(e) => {
                tracing::warn!("Failed to load config file: {:#}", e);
            }
        }
    }

    RenderConfig::default()
}

/// Load configuration from a specific path
pub fn load_from(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    RenderConfig::from_yaml(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}
