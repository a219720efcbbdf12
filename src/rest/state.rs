//! API state management for the REST server.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::catalog::{CatalogStore, MemoryStore, MySqlStore};
use crate::config::Config;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Catalog backend
    pub store: Arc<dyn CatalogStore>,
    /// Application configuration (page sizes, featured limit)
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(store: Arc<dyn CatalogStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Open the configured store: MySQL when a database URL is set, otherwise
    /// an in-memory store seeded from `paths.seed` (or empty).
    pub async fn from_config(config: Config) -> Result<Self> {
        let max_featured = config.catalog.max_featured;

        let store: Arc<dyn CatalogStore> = if let Some(url) = &config.database.url {
            let store = MySqlStore::connect(url, config.database.max_connections)
                .await
                .context("Failed to connect to the catalog database")?
                .with_max_featured(max_featured);
            store
                .init()
                .await
                .context("Failed to create catalog tables")?;
            Arc::new(store)
        } else if let Some(seed) = config.seed_path() {
            let store = MemoryStore::from_seed_file(&seed)
                .context("Failed to load catalog seed")?
                .with_max_featured(max_featured);
            Arc::new(store)
        } else {
            tracing::warn!("No database or seed configured, serving an empty catalog");
            Arc::new(MemoryStore::empty().with_max_featured(max_featured))
        };

        Ok(Self::new(store, config))
    }
}
