//! Engine loader for initializing engines from configuration

use super::registry::EngineRegistry;
use super::traits::SearchEngine;
use super::{duckduckgo, page_text};
use crate::config::{EngineConfig, Settings};
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing engines from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Build a registry holding every enabled engine from settings
    pub fn load(settings: &Settings, client: &HttpClient) -> Result<EngineRegistry> {
        let mut registry = EngineRegistry::new();

        for config in &settings.engines {
            if config.disabled {
                info!("Skipping disabled engine: {}", config.name);
                continue;
            }

            match Self::create_engine(&config.engine, config, client) {
                Ok(engine) => {
                    info!("Loaded engine: {} ({})", config.name, config.engine);
                    registry.register(config.name.clone(), engine);
                }
                Err(e) => {
                    warn!("Failed to load engine {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} engines", registry.len());
        Ok(registry)
    }

    /// Create an engine instance by type
    fn create_engine(
        engine_type: &str,
        config: &EngineConfig,
        client: &HttpClient,
    ) -> Result<Arc<dyn SearchEngine>> {
        let mut engine: Box<dyn SearchEngine> = match engine_type {
            "duckduckgo_lite" => Box::new(duckduckgo::DuckDuckGoLite::new(client.clone())),
            "page_text" => Box::new(page_text::PageText::new(client.clone())),
            _ => {
                return Err(anyhow::anyhow!("Unknown engine type: {}", engine_type));
            }
        };

        engine.init(config)?;

        Ok(Arc::from(engine))
    }
}
