//! Builds the provider registry from configuration

use super::client::HttpProviderClient;
use super::registry::ProviderRegistry;
use super::traits::Provider;
use super::{eztv, tpb, yts};
use crate::cache::CacheLayer;
use crate::config::{ProviderConfig, Settings};
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all enabled providers from settings
    pub fn load(
        settings: &Settings,
        http: &HttpClient,
        cache: Arc<CacheLayer>,
    ) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        for config in settings.providers.iter().filter(|p| p.disabled) {
            info!("Skipping disabled provider: {}", config.name);
        }

        for config in settings.enabled_providers() {
            match Self::create_provider(&config.provider, config) {
                Ok(provider) => {
                    let timeout = config
                        .timeout
                        .map(Duration::from_secs_f64)
                        .unwrap_or_else(|| http.default_timeout())
                        .min(Duration::from_secs(crate::MAX_TIMEOUT));
                    let client =
                        HttpProviderClient::new(provider, http.clone(), cache.clone())
                            .with_timeout(timeout);

                    info!("Loaded provider: {} ({})", config.name, config.provider);
                    registry.register(Arc::new(client));
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", registry.len());
        Ok(registry)
    }

    fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
        let mut provider: Box<dyn Provider> = match provider_type {
            "yts" => Box::new(yts::Yts::new()),
            "eztv" => Box::new(eztv::Eztv::new()),
            "tpb" => Box::new(tpb::ThePirateBay::new()),
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown provider type: {} (expected one of: {})",
                    provider_type,
                    Self::available_providers().join(", ")
                ));
            }
        };

        provider.init(config)?;

        Ok(Arc::from(provider))
    }

    /// Provider types that can be named in configuration
    pub fn available_providers() -> Vec<&'static str> {
        vec!["yts", "eztv", "tpb"]
    }
}
