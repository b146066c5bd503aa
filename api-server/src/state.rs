// Application state for the API server
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

use dexcandles_common::{CacheBackend, Config, Graph, MetricsCollector, Result};

use crate::cache::{CacheStore, MemoryStore, RedisStore};
use crate::candles::{CandleSource, SubgraphCandles};

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub candles: Arc<dyn CandleSource>,
    pub metrics: Arc<MetricsCollector>,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        let cache: Arc<dyn CacheStore> = match config.cache_backend {
            CacheBackend::Memory => Arc::new(MemoryStore::new(ttl, config.cache_max_entries)),
            CacheBackend::Redis => Arc::new(RedisStore::new(&config.redis_url, ttl).await?),
        };

        let graph = Graph::with_timeout(
            config.graph_url.clone(),
            Duration::from_secs(config.graph_timeout_secs),
        )?;

        Ok(Self {
            cache,
            candles: Arc::new(SubgraphCandles::new(graph)),
            metrics: Arc::new(MetricsCollector::new()),
            prometheus: None,
        })
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
