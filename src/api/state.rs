use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::CatalogStore;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// The store is opened once in `main` and closed after the server stops.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
