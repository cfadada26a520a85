use std::sync::Arc;

use crate::config::Config;
use crate::middleware::rate_limit::RequestLimiter;
use crate::services::{FileStorage, TextExtractor, TextGenerator};

/// Shared application state injected into route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn TextGenerator>,
    pub extractor: Arc<dyn TextExtractor>,
    pub storage: FileStorage,
    pub limiter: Arc<RequestLimiter>,
}

impl AppState {
    pub fn new(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let storage = FileStorage::new(config.storage_dir.clone());
        let limiter = Arc::new(RequestLimiter::new(config.max_concurrent_requests));
        Self {
            config: Arc::new(config),
            generator,
            extractor,
            storage,
            limiter,
        }
    }
}
