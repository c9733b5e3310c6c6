use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::security::RateLimits;
use crate::services::distance_service::{DistanceLookup, GoogleDistanceMatrix};
use crate::storage::{FileBackend, RecordStore};

/// Shared handles for every request handler. Cloning is cheap; everything
/// heavyweight sits behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: RecordStore,
    pub limits: Arc<RateLimits>,
    pub distance: Option<Arc<dyn DistanceLookup>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = RecordStore::new(Arc::new(FileBackend::new(&config.data_dir)));
        Self::with_store(config, store)
    }

    /// Assembles state around an existing store, which is how tests inject
    /// temp-dir or in-memory backends.
    pub fn with_store(config: Config, store: RecordStore) -> Self {
        let distance = config.maps_api_key.clone().map(|key| {
            Arc::new(GoogleDistanceMatrix::new(key, config.maps_api_url.clone()))
                as Arc<dyn DistanceLookup>
        });
        Self {
            config: Arc::new(config),
            store,
            limits: Arc::new(RateLimits::default()),
            distance,
            started_at: Instant::now(),
        }
    }
}
