use anyhow::{Context, Result};
use gbn_common::{Conventions, KindCatalog};
use gbn_style::{RetryPolicy, DEFAULT_UNIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "gbn.config.json";

/// gbn configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Reserved attribute and tag names
    pub conventions: Conventions,

    /// Fragment kinds the cascade accepts
    pub kinds: KindCatalog,

    /// How long the cascade waits for a style applicator
    pub retry: RetryPolicy,

    /// Unit appended to bare numbers in length values
    pub default_unit: String,

    /// Fail on the first markup diagnostic instead of recovering
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            conventions: Conventions::default(),
            kinds: KindCatalog::open(),
            retry: RetryPolicy::default(),
            default_unit: DEFAULT_UNIT.to_string(),
            strict: false,
        }
    }
}

impl Config {
    /// Load `explicit` if given, else `gbn.config.json` in `cwd`, else defaults
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
                if !path.exists() {
                    return Ok(Config::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "conventions": { "identityAttribute": "data-x-id", "transparentTag": "x-wrap" },
            "kinds": { "kinds": ["card", "hero"], "closed": true },
            "retry": { "delayMs": 10 },
            "defaultUnit": "rem"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.conventions.identity_attribute, "data-x-id");
        assert_eq!(config.conventions.transparent_tag, "x-wrap");
        assert_eq!(config.conventions.root_attribute, "data-gbn-root");
        assert!(config.kinds.contains("Card"));
        assert!(!config.kinds.contains("footer"));
        assert_eq!(config.retry.delay_ms, 10);
        assert_eq!(config.retry.max_attempts, 20);
        assert_eq!(config.default_unit, "rem");
        assert!(!config.strict);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.conventions, Conventions::default());
        assert!(!config.kinds.is_closed());
        assert_eq!(config.default_unit, "px");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join("gbn-config-test-missing");
        let config = Config::load(&dir, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = std::env::temp_dir();
        let missing = dir.join("gbn-config-test-does-not-exist.json");
        assert!(Config::load(&dir, Some(&missing)).is_err());
    }
}
