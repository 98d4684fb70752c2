//! Configuration management for HTB Finder
//!
//! Settings are resolved with multi-source precedence:
//! 1. Default values
//! 2. Config file (explicit `--config`, `./htb-finder.toml`, or the user config dir)
//! 3. Environment variables (`HTB_FINDER_URL`, `HTB_FINDER_CACHE`)
//! 4. CLI arguments (applied by the command layer)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::{BundleCache, ClientConfig, Reformatter, ReformatterKind};
use crate::constants::{env, files, format, http, source};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote bundle location
    pub source: SourceConfig,
    /// Local cache location
    pub cache: CacheConfig,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Reformatting settings
    pub format: FormatConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: source::BUNDLE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file; relative paths resolve against the working directory
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(files::CACHE_FILE_NAME),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime client configuration
    pub fn to_runtime_config(&self) -> ConfigResult<ClientConfig> {
        for (field, value) in [
            ("client.request_timeout_secs", self.request_timeout_secs),
            ("client.connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Timeouts must be greater than 0".to_string(),
                });
            }
        }

        Ok(ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Which reformatter runs after each download
    pub reformatter: ReformatterKind,
    /// External beautifier program
    pub beautifier: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            reformatter: ReformatterKind::Auto,
            beautifier: format::BEAUTIFIER_PROGRAM.to_string(),
        }
    }
}

impl FormatConfig {
    pub fn build(&self) -> Box<dyn Reformatter> {
        self.reformatter.build(&self.beautifier)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `config_file_override` that does not exist is an error;
    /// missing default locations are not.
    pub async fn load(config_file_override: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::SOURCE_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Source URL overridden by {}", env::SOURCE_URL);
            self.source.url = url;
        }
        if let Some(path) = lookup(env::CACHE_PATH).filter(|v| !v.trim().is_empty()) {
            debug!("Cache path overridden by {}", env::CACHE_PATH);
            self.cache.path = PathBuf::from(path);
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn bundle_cache(&self) -> BundleCache {
        BundleCache::new(&self.cache.path)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join(files::CONFIG_DIR_NAME).join("config.toml"));
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let config = Self::from_toml(&content)?;
        debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source.url, source::BUNDLE_URL);
        assert_eq!(config.cache.path, PathBuf::from("bundle.js"));
        assert_eq!(config.format.reformatter, ReformatterKind::Auto);
        assert_eq!(config.format.beautifier, "js-beautify");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
[cache]
path = "/var/cache/htb/bundle.js"

[format]
reformatter = "inline"
"#,
        )
        .unwrap();

        assert_eq!(config.cache.path, PathBuf::from("/var/cache/htb/bundle.js"));
        assert_eq!(config.format.reformatter, ReformatterKind::Inline);
        assert_eq!(config.format.beautifier, "js-beautify");
        assert_eq!(config.source.url, source::BUNDLE_URL);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml("[format]\nreformatter = \"fancy\""),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "HTB_FINDER_URL" => Some("http://localhost:8080/bundle.js".to_string()),
            "HTB_FINDER_CACHE" => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.source.url, "http://localhost:8080/bundle.js");
        assert_eq!(config.cache.path, PathBuf::from("bundle.js"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let client = ClientConfigToml {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            client.to_runtime_config(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(ClientConfigToml::default().to_runtime_config().is_ok());
    }

    #[tokio::test]
    async fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("htb-finder.toml");
        tokio::fs::write(&path, "[client]\nrequest_timeout_secs = 5\n")
            .await
            .unwrap();

        let config = AppConfig::load(Some(&path)).await.unwrap();
        assert_eq!(config.client.request_timeout_secs, 5);
        assert_eq!(config.client.connect_timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_load_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)).await,
            Err(ConfigError::NotFound { .. })
        ));
    }
}
