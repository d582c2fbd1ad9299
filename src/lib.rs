pub mod annotate;
pub mod cache;
pub mod config;
pub mod domain {
    pub mod driftavbrott;
}
pub mod evaluate;
pub mod http {
    pub mod middleware {
        pub mod driftavbrott;
    }
}
pub mod messages;
pub mod source;

use std::sync::Arc;

use crate::cache::WindowCache;
use crate::config::GateConfig;
use crate::messages::MessageCatalog;
use crate::source::WindowSource;

/// Shared state handed to the middleware; cheap to clone.
#[derive(Clone)]
pub struct DriftavbrottGate {
    pub config: Arc<GateConfig>,
    pub cache: WindowCache,
    pub catalog: Arc<MessageCatalog>,
}

impl DriftavbrottGate {
    pub fn new(source: Arc<dyn WindowSource>, config: GateConfig) -> Self {
        tracing::debug!("gate configuration: {config:?}");
        let config = Arc::new(config);
        Self {
            cache: WindowCache::new(source, config.clone()),
            catalog: Arc::new(MessageCatalog::builtin()),
            config,
        }
    }

    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }
}
