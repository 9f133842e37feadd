//! Server shared state
//!
//! Holds configuration and the map service for the HTTP server.

use crate::config::Config;
use crate::error::Result;
use crate::provider::{AmapClient, MapProvider};
use crate::service::MapService;
use std::sync::Arc;
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState<P> {
    /// Configuration the server was started with
    pub config: Config,

    service: MapService<P>,
    started: Instant,
}

impl AppState<AmapClient> {
    /// State backed by the configured AMap client
    pub fn from_config(config: Config) -> Result<Self> {
        let service = MapService::from_config(&config)?;
        Ok(Self::with_service(config, service))
    }
}

impl<P: MapProvider> AppState<P> {
    /// State over an explicit provider
    pub fn new(config: Config, provider: Arc<P>) -> Self {
        let service = MapService::new(provider, &config);
        Self::with_service(config, service)
    }

    fn with_service(config: Config, service: MapService<P>) -> Self {
        Self {
            config,
            service,
            started: Instant::now(),
        }
    }

    pub fn service(&self) -> &MapService<P> {
        &self.service
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
