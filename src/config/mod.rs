//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/wayfinder/config.toml

pub mod defaults;

use crate::cache::CacheSettings;
use crate::constants::api::AMAP_KEY_ENV;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Mapping provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Resolution cache bounds
    #[serde(default)]
    pub cache: CacheConfig,

    /// Place search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Geocode resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Default values for CLI output
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Mapping provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API root, e.g. https://restapi.amap.com/v3
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Web service key; empty means read AMAP_API_KEY
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Resolution cache bounds, applied to each component's cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum entries per cache (0 = unbounded)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Entry lifetime in seconds (0 = never expires)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

/// Place search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Scope used when a search names no city
    #[serde(default = "default_city")]
    pub default_city: String,
}

/// Geocode resolver settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Report failures instead of substituting the default location
    #[serde(default)]
    pub strict: bool,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Default values for CLI output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Default travel mode
    #[serde(default = "default_mode")]
    pub mode: String,
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_PROVIDER_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}
fn default_max_entries() -> usize {
    DEFAULT_CACHE_MAX_ENTRIES
}
fn default_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
fn default_city() -> String {
    DEFAULT_SEARCH_CITY.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_mode() -> String {
    DEFAULT_MODE.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: default_ttl(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            mode: default_mode(),
        }
    }
}

impl ProviderConfig {
    /// The configured key, or AMAP_API_KEY when the config leaves it empty
    pub fn resolved_api_key(&self) -> String {
        if !self.api_key.trim().is_empty() {
            return self.api_key.trim().to_string();
        }
        std::env::var(AMAP_KEY_ENV).unwrap_or_default()
    }
}

impl CacheConfig {
    pub fn settings(&self) -> CacheSettings {
        CacheSettings {
            max_entries: (self.max_entries > 0).then_some(self.max_entries),
            ttl: (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs)),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path ("section.key")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["provider", "base_url"] => Some(self.provider.base_url.clone()),
            ["provider", "api_key"] => Some(self.provider.api_key.clone()),
            ["provider", "timeout_secs"] => Some(self.provider.timeout_secs.to_string()),

            ["cache", "max_entries"] => Some(self.cache.max_entries.to_string()),
            ["cache", "ttl_secs"] => Some(self.cache.ttl_secs.to_string()),

            ["search", "default_city"] => Some(self.search.default_city.clone()),

            ["resolver", "strict"] => Some(self.resolver.strict.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["defaults", "format"] => Some(self.defaults.format.clone()),
            ["defaults", "mode"] => Some(self.defaults.mode.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path ("section.key")
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["provider", "base_url"] => {
                self.provider.base_url = value.to_string();
            }
            ["provider", "api_key"] => {
                self.provider.api_key = value.to_string();
            }
            ["provider", "timeout_secs"] => {
                self.provider.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["cache", "max_entries"] => {
                self.cache.max_entries = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid max_entries value: {}", value))
                })?;
            }
            ["cache", "ttl_secs"] => {
                self.cache.ttl_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid ttl value: {}", value))
                })?;
            }

            ["search", "default_city"] => {
                self.search.default_city = value.to_string();
            }

            ["resolver", "strict"] => {
                self.resolver.strict = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["defaults", "format"] => {
                let formatter = crate::format::get_formatter(value)
                    .ok_or_else(|| crate::format::unknown_format(value))?;
                self.defaults.format = formatter.name().to_string();
            }
            ["defaults", "mode"] => {
                let mode: crate::service::route::TravelMode =
                    value.parse().map_err(Error::Config)?;
                self.defaults.mode = mode.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "provider.base_url",
            "provider.api_key",
            "provider.timeout_secs",
            "cache.max_entries",
            "cache.ttl_secs",
            "search.default_city",
            "resolver.strict",
            "server.host",
            "server.port",
            "defaults.format",
            "defaults.mode",
        ]
    }

    /// Cache bounds for the resolver and search caches
    pub fn cache_settings(&self) -> CacheSettings {
        self.cache.settings()
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.provider.base_url, "https://restapi.amap.com/v3");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.cache.max_entries, 1024);
        assert_eq!(config.search.default_city, "全国");
        assert!(!config.resolver.strict);
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.defaults.mode, "driving");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("resolver.strict"), Some("false".to_string()));
        config.set("resolver.strict", "true").unwrap();
        assert!(config.resolver.strict);

        config.set("search.default_city", "杭州").unwrap();
        assert_eq!(config.get("search.default_city"), Some("杭州".to_string()));

        config.set("cache.ttl_secs", "300").unwrap();
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn test_set_mode_normalizes() {
        let mut config = Config::default();
        config.set("defaults.mode", "Bike").unwrap();
        assert_eq!(config.defaults.mode, "bicycling");
        assert!(config.set("defaults.mode", "teleport").is_err());
    }

    #[test]
    fn test_set_format_checks_name() {
        let mut config = Config::default();
        config.set("defaults.format", "gpx").unwrap();
        assert_eq!(config.defaults.format, "gpx");
        assert!(config.set("defaults.format", "yaml").is_err());
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_number").is_err());
        assert!(config.set("resolver.strict", "maybe").is_err());
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
    }

    #[test]
    fn test_cache_settings() {
        let mut config = Config::default();
        let settings = config.cache_settings();
        assert_eq!(settings.max_entries, Some(1024));
        assert_eq!(settings.ttl, None);

        config.cache.max_entries = 0;
        config.cache.ttl_secs = 60;
        let settings = config.cache_settings();
        assert_eq!(settings.max_entries, None);
        assert_eq!(settings.ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_configured_api_key_wins() {
        let provider = ProviderConfig {
            api_key: " abc123 ".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(provider.resolved_api_key(), "abc123");
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.search.default_city = "成都".to_string();
            config.cache.max_entries = 16;
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.search.default_city, "成都");
            assert_eq!(loaded.cache.max_entries, 16);
        });
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[resolver]\nstrict = true\n").unwrap();
        assert!(config.resolver.strict);
        assert_eq!(config.cache.max_entries, 1024);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[provider]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[resolver]"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[defaults]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }
}
