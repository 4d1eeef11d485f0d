//! concertim.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the HMAC signing secret unless overridden.
pub const DEFAULT_SECRET_ENV: &str = "JWT_SECRET";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,concertim=debug";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlueConfig {
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
    /// Name of the environment variable that carries the signing secret.
    /// The secret itself never lives in the file.
    pub secret_env: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret_env: DEFAULT_SECRET_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl GlueConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GlueConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlueConfig::default();
        assert_eq!(config.auth.secret_env, "JWT_SECRET");
        assert_eq!(config.logging.filter, "info,concertim=debug");
    }

    #[test]
    fn test_parse_empty() {
        let config: GlueConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlueConfig::default());
    }

    #[test]
    fn test_parse_partial() {
        let toml_str = r#"
[auth]
secret_env = "CONCERTIM_SECRET"
"#;
        let config: GlueConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.auth.secret_env, "CONCERTIM_SECRET");
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concertim.toml");

        let mut config = GlueConfig::default();
        config.logging.filter = "warn".to_string();
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = GlueConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.logging.filter, "warn");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GlueConfig::from_file(&dir.path().join("absent.toml")).is_err());
    }
}
