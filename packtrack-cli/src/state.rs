use std::sync::Arc;

use anyhow::Context;
use packtrack_core::KeyValueStore;
use packtrack_order::{OrderStore, SnapshotRepository};
use packtrack_store::{Config, FileStore};

/// Everything a command needs: the live order store and where it is saved.
pub struct AppState {
    pub store: OrderStore,
    pub repo: SnapshotRepository,
    pub config: Config,
}

impl AppState {
    /// Open the configured data directory and restore any saved orders.
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        let data_dir = &config.storage.data_dir;
        let files = FileStore::new(data_dir)
            .await
            .with_context(|| format!("Failed to open data dir {}", data_dir.display()))?;
        Self::with_backend(config, Arc::new(files)).await
    }

    pub async fn with_backend(config: Config, kv: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let repo = SnapshotRepository::with_keys(
            kv,
            &config.storage.orders_key,
            &config.storage.counter_key,
        );
        let store = repo
            .load()
            .await
            .context("Failed to restore saved orders")?
            .unwrap_or_default();

        Ok(Self { store, repo, config })
    }

    pub async fn persist(&self) -> anyhow::Result<()> {
        self.repo
            .save(&self.store)
            .await
            .context("Failed to save orders")
    }
}
