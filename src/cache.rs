use crate::config::GateConfig;
use crate::domain::driftavbrott::Driftavbrott;
use crate::source::WindowSource;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// How long a fetched window (or a fetched absence) stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct WindowCache {
    source: Arc<dyn WindowSource>,
    config: Arc<GateConfig>,
    inner: Arc<RwLock<Slot>>,
    ttl: Duration,
}

#[derive(Default)]
struct Slot {
    window: Option<Driftavbrott>,
    last_fetch: Option<Instant>,
}

impl WindowCache {
    pub fn new(source: Arc<dyn WindowSource>, config: Arc<GateConfig>) -> Self {
        Self::with_ttl(source, config, CACHE_TTL)
    }

    /// TTL override for tests; production wiring sticks to [`CACHE_TTL`].
    pub fn with_ttl(source: Arc<dyn WindowSource>, config: Arc<GateConfig>, ttl: Duration) -> Self {
        Self {
            source,
            config,
            inner: Arc::new(RwLock::new(Slot::default())),
            ttl,
        }
    }

    /// Returns the current window snapshot, refreshing it first when the TTL
    /// has lapsed. A failed refresh keeps the previous snapshot and does not
    /// touch the staleness clock.
    pub async fn maybe_refresh(&self) -> Option<Driftavbrott> {
        {
            let read = self.inner.read().await;
            if read.last_fetch.is_some_and(|at| at.elapsed() <= self.ttl) {
                return read.window.clone();
            }
        }

        match self
            .source
            .fetch_ongoing(&self.config.kanaler, &self.config.system, self.config.marginal)
            .await
        {
            Ok(window) => {
                tracing::debug!("fetched ongoing driftavbrott: {window:?}");
                let mut write = self.inner.write().await;
                write.window = window.clone();
                write.last_fetch = Some(Instant::now());
                window
            }
            Err(e) => {
                tracing::warn!("could not fetch ongoing driftavbrott, keeping cached state: {e}");
                self.inner.read().await.window.clone()
            }
        }
    }
}
