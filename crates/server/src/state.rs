//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PaddockConfig;
use crate::db::Store;
use crate::services::FileStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the store, the file store and the
/// configuration. Handlers receive it through `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PaddockConfig,
    store: Arc<dyn Store>,
    files: Arc<dyn FileStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: PaddockConfig, store: Arc<dyn Store>, files: Arc<dyn FileStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                files,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &PaddockConfig {
        &self.inner.config
    }

    /// Get a reference to the persistence layer.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get a reference to the upload file store.
    #[must_use]
    pub fn files(&self) -> &dyn FileStore {
        self.inner.files.as_ref()
    }
}
