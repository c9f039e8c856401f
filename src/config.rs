//! Configuration management for Campus Content
//!
//! Handles loading and validating configuration.
//! Configuration lives in `<config dir>/campus-content/config.json`; the backend
//! base URL and default locale can be overridden from the environment.

use crate::error::{ConfigError, ConfigResult};
use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier, used for the configuration directory
pub const APP_ID: &str = "campus-content";

/// Configuration file name inside the configuration directory
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable selecting the backend host
pub const BASE_URL_ENV: &str = "CAMPUS_API_BASE_URL";

/// Environment variable selecting the default locale
pub const LOCALE_ENV: &str = "CAMPUS_LOCALE";

/// Backend used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend configuration
    pub api: ApiConfig,

    /// Locale configuration
    pub locale: LocaleConfig,

    /// Cache configuration
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from the default location or return defaults,
    /// then apply environment overrides
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_file()?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            log::debug!("No configuration at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            log::debug!("Backend base URL overridden by {}", BASE_URL_ENV);
            self.api.base_url = url.trim().to_string();
        }

        if let Some(tag) = lookup(LOCALE_ENV) {
            match Locale::parse(&tag) {
                Some(locale) => self.locale.default = locale,
                None => log::warn!("Ignoring unsupported {}={}", LOCALE_ENV, tag),
            }
        }
    }

    /// Check values that would make every request fail
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "api.base_url".to_string(),
                reason: format!("'{}' is not an http(s) URL", url),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "api.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if !self.locale.supported.is_empty() && !self.locale.supported.contains(&self.locale.default) {
            return Err(ConfigError::InvalidValue {
                key: "locale.default".to_string(),
                reason: format!("'{}' is not in locale.supported", self.locale.default),
            });
        }

        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the configuration file path
    pub fn config_file() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE))
    }
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend, without the `/api/...` path
    pub base_url: String,

    /// Transport timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with each request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("{}/{}", APP_ID, env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Base URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

/// Locale configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale used when none is requested or the requested one is unknown
    pub default: Locale,

    /// Locales offered to the user
    pub supported: Vec<Locale>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: Locale::Ru,
            supported: Locale::ALL.to_vec(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Share payloads between views requesting the same URL
    pub shared: bool,
}
