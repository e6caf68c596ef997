//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::ProductCache;
use crate::config::ServerConfig;
use crate::flags::FlagStore;
use crate::vendor::{VendorClient, VendorError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: the product cache, the flag store, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    cache: ProductCache,
    flags: FlagStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor HTTP client cannot be built.
    pub fn new(config: ServerConfig) -> Result<Self, VendorError> {
        let vendor = VendorClient::new(&config.vendor)?;
        let cache = ProductCache::new(Arc::new(vendor), config.cache);
        let flags = FlagStore::load(&config.flags_path);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                cache,
                flags,
            }),
        })
    }

    /// Build a state around an existing cache (used by tests).
    #[must_use]
    pub fn with_parts(config: ServerConfig, cache: ProductCache, flags: FlagStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                cache,
                flags,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the product cache.
    #[must_use]
    pub fn cache(&self) -> &ProductCache {
        &self.inner.cache
    }

    /// Get a reference to the flag store.
    #[must_use]
    pub fn flags(&self) -> &FlagStore {
        &self.inner.flags
    }
}
