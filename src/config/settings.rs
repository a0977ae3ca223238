//! Settings structures for Torrentio-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
    pub redis: Option<RedisSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            search: SearchSettings::default(),
            cache: CacheSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
            redis: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (TORRENTIO_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("TORRENTIO_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("TORRENTIO_LOG_LEVEL") {
            self.general.log_level = val;
        }
        if let Some(port) = var("TORRENTIO_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("TORRENTIO_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("TORRENTIO_ALLOWED_ORIGINS") {
            self.server.allowed_origins = Some(
                val.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
            );
        }
        if let Some(max) = var("TORRENTIO_MAX_RESULTS").and_then(|v| v.parse().ok()) {
            self.search.max_results = max;
        }
        if let Some(url) = var("TORRENTIO_REDIS_URL") {
            match self.redis {
                Some(ref mut redis) => redis.url = url,
                None => {
                    self.redis = Some(RedisSettings {
                        url,
                        ..Default::default()
                    })
                }
            }
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }

    /// Log filter used when RUST_LOG is unset. Debug mode wins over the
    /// configured level.
    pub fn log_filter(&self) -> &str {
        if self.general.debug {
            "debug"
        } else {
            &self.general.log_level
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log at debug level regardless of `log_level`
    pub debug: bool,
    /// Instance name reported by the status endpoint
    pub instance_name: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Torrentio".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// CORS origins, any origin when unset
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "127.0.0.1".to_string(),
            allowed_origins: None,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum listings returned per search
    pub max_results: usize,
    /// Cache entry lifetime in seconds
    pub cache_ttl: u64,
    /// Deadline for a whole search in seconds
    pub search_timeout: Option<f64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: crate::DEFAULT_MAX_RESULTS,
            cache_ttl: crate::DEFAULT_CACHE_TTL,
            search_timeout: None,
        }
    }
}

/// Local cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of local entries
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// User agents rotated across requests
    pub user_agents: Vec<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 20,
            verify_ssl: true,
            user_agents: crate::network::default_user_agents(),
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Individual provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Provider module to use
    pub provider: String,
    /// Whether provider is disabled
    pub disabled: bool,
    /// Override of the provider's API root
    pub base_url: Option<String>,
    /// Custom timeout for this provider in seconds
    pub timeout: Option<f64>,
}

/// Redis/Valkey settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub url: String,
    /// Seconds to wait for the initial connection
    pub connect_timeout: f64,
    /// Seconds a single GET or SET may take before the tier counts as down
    pub op_timeout: f64,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: 5.0,
            op_timeout: 1.0,
        }
    }
}

/// Default provider configurations, in merge priority order
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "yts".to_string(),
            provider: "yts".to_string(),
            ..Default::default()
        },
        ProviderConfig {
            name: "eztv".to_string(),
            provider: "eztv".to_string(),
            ..Default::default()
        },
        ProviderConfig {
            name: "tpb".to_string(),
            provider: "tpb".to_string(),
            ..Default::default()
        },
    ]
}
