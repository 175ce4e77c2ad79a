use std::sync::Arc;

use crate::config::GeofenceConfig;
use crate::resolve::RedirectResolver;
use crate::storage::{JsonlBranchStore, JsonlRecordStore, StorageConfig};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub records: Arc<JsonlRecordStore>,
    pub branches: Arc<JsonlBranchStore>,
    pub resolver: Arc<dyn RedirectResolver>,
    pub geofence: GeofenceConfig,

    /// Allowed CORS origin; `"*"` keeps the permissive default
    pub cors_origin: String,
}

impl AppState {
    /// Build the state for a storage location with a given resolver.
    pub fn new(
        storage: StorageConfig,
        resolver: Arc<dyn RedirectResolver>,
        geofence: GeofenceConfig,
    ) -> Self {
        Self {
            records: Arc::new(JsonlRecordStore::new(storage.clone())),
            branches: Arc::new(JsonlBranchStore::new(storage.clone())),
            storage: Arc::new(storage),
            resolver,
            geofence,
            cors_origin: "*".to_string(),
        }
    }

    /// Builder method to restrict CORS to one origin.
    pub fn with_cors_origin(mut self, origin: String) -> Self {
        self.cors_origin = origin;
        self
    }
}
