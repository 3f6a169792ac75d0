use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::notify::{Notifier, TracingNotifier};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Collaborators shared by every service
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
    pub metrics: Arc<Metrics>,
    pub latency: Duration,
}

impl ServiceContext {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store,
            notifier,
            metrics,
            latency: Duration::ZERO,
        }
    }

    /// Memory store, logging notifier, fresh registry
    pub fn in_memory() -> Result<Self, prometheus::Error> {
        Ok(Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TracingNotifier),
            Arc::new(Metrics::new()?),
        ))
    }

    /// File store when a data directory is configured, memory otherwise
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => {
                let store = FileStore::open(dir.clone())
                    .await
                    .with_context(|| format!("Failed to open data directory {}", dir.display()))?;
                tracing::info!(data_dir = %dir.display(), "Using file store");
                Arc::new(store)
            }
            None => {
                tracing::info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };
        let metrics = Metrics::new().context("Failed to register metrics")?;

        Ok(Self::new(store, Arc::new(TracingNotifier), Arc::new(metrics))
            .with_latency(config.simulated_latency))
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
