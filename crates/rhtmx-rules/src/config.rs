// File: src/config.rs
// Purpose: Configuration parsing from the [validation] table of rhtmx.toml

use crate::builder::DEFAULT_MAX_DEPTH;
use crate::context::DEFAULT_KEY_PREFIX;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level file layout; only the `[validation]` table is read
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    validation: RulesConfig,
}

/// Client-side rule generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Prefix of the per-render context key (default: "rhtmx_rules")
    #[serde(default = "default_key_prefix")]
    pub context_key_prefix: String,

    /// Maximum nesting levels expanded, counting the root (default: 8)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Whether form containers get `data-fluent-validation` (default: true)
    #[serde(default = "default_true")]
    pub container_marker: bool,
}

// Default values
fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            context_key_prefix: default_key_prefix(),
            max_depth: default_max_depth(),
            container_marker: true,
        }
    }
}

impl RulesConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = toml::from_str(content)?;
        let config = file.validation;
        if config.max_depth == 0 {
            anyhow::bail!("validation.max_depth must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RulesConfig::default();
        assert_eq!(config.context_key_prefix, "rhtmx_rules");
        assert_eq!(config.max_depth, 8);
        assert!(config.container_marker);
    }

    #[test]
    fn test_empty_config() {
        let config = RulesConfig::from_toml("").unwrap();
        assert_eq!(config, RulesConfig::default());
    }

    #[test]
    fn test_other_tables_are_ignored() {
        let toml = r#"
            [server]
            port = 8080

            [validation]
            max_depth = 3
        "#;
        let config = RulesConfig::from_toml(toml).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.context_key_prefix, "rhtmx_rules");
    }

    #[test]
    fn test_custom_values() {
        let toml = r#"
            [validation]
            context_key_prefix = "fv"
            container_marker = false
        "#;
        let config = RulesConfig::from_toml(toml).unwrap();
        assert_eq!(config.context_key_prefix, "fv");
        assert!(!config.container_marker);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = RulesConfig::from_toml("[validation]\nmax_depth = 0").unwrap_err();
        assert!(err.to_string().contains("max_depth"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = RulesConfig::load("does/not/exist/rhtmx.toml").unwrap();
        assert_eq!(config, RulesConfig::default());
    }
}
