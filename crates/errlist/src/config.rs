//! Configuration for chain rendering.

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};

/// Tree renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// One indent group, repeated once per depth level
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Marker placed before every cause
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Leave out nodes without payload or context
    #[serde(default)]
    pub skip_empty: bool,
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_marker() -> String {
    "  L ".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            marker: default_marker(),
            skip_empty: false,
        }
    }
}

impl RenderConfig {
    /// Parse configuration from YAML; missing fields take their defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ChainError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.indent, "    ");
        assert_eq!(config.marker, "  L ");
        assert!(!config.skip_empty);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: RenderConfig = serde_yaml::from_str("skip_empty: true\n").unwrap();
        assert!(config.skip_empty);
        assert_eq!(config.marker, "  L ");
    }

    #[test]
    fn test_from_yaml() {
        let config = RenderConfig::from_yaml("indent: \"  \"\nmarker: \"-> \"\n").unwrap();
        assert_eq!(config.indent, "  ");
        assert_eq!(config.marker, "-> ");
        assert!(!config.skip_empty);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = RenderConfig::from_yaml("skip_empty: [not, a, bool]\n").unwrap_err();
        assert!(matches!(err, ChainError::Config(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = RenderConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: RenderConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
