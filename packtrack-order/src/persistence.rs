use std::sync::Arc;

use packtrack_core::{Header, KeyValueStore, StoreError};
use tracing::{info, warn};

use crate::manager::OrderStore;
use crate::models::Order;

pub const ORDERS_KEY: &str = "orders";
pub const COUNTER_KEY: &str = "currentId";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Saved orders are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Saved id counter is not a number: {0}")]
    InvalidCounter(String),
}

/// Saves and restores an `OrderStore` through a key-value backend.
///
/// Orders go under one key as a JSON array; the next id goes under another as
/// a decimal string.
pub struct SnapshotRepository {
    kv: Arc<dyn KeyValueStore>,
    orders_key: String,
    counter_key: String,
}

impl SnapshotRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(kv, ORDERS_KEY, COUNTER_KEY)
    }

    pub fn with_keys(kv: Arc<dyn KeyValueStore>, orders_key: &str, counter_key: &str) -> Self {
        Self {
            kv,
            orders_key: orders_key.to_string(),
            counter_key: counter_key.to_string(),
        }
    }

    pub async fn save(&self, store: &OrderStore) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(store.snapshot())?;
        self.kv.set(&self.orders_key, &json).await?;
        self.kv
            .set(&self.counter_key, &store.next_id().to_string())
            .await?;
        info!("Saved {} orders (next id {})", store.len(), store.next_id());
        Ok(())
    }

    /// `None` when nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<OrderStore>, PersistenceError> {
        let saved_orders = self.kv.get(&self.orders_key).await?;
        let saved_counter = self.kv.get(&self.counter_key).await?;
        if saved_orders.is_none() && saved_counter.is_none() {
            return Ok(None);
        }

        let mut orders: Vec<Order> = match saved_orders {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        intern_headers(&mut orders);

        let next_id = match saved_counter {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| PersistenceError::InvalidCounter(raw.clone()))?,
            None => {
                warn!("No saved id counter; deriving it from stored orders");
                1
            }
        };

        let store = OrderStore::from_parts(orders, next_id);
        info!("Restored {} orders (next id {})", store.len(), store.next_id());
        Ok(Some(store))
    }

    pub async fn clear(&self) -> Result<(), PersistenceError> {
        self.kv.remove(&self.orders_key).await?;
        self.kv.remove(&self.counter_key).await?;
        Ok(())
    }
}

/// Each saved order carries its own copy of the header; make equal headers
/// share one allocation again.
fn intern_headers(orders: &mut [Order]) {
    let mut seen: Vec<Header> = Vec::new();
    for order in orders.iter_mut() {
        match seen.iter().find(|h| **h == order.headers) {
            Some(existing) => order.headers = existing.clone(),
            None => seen.push(order.headers.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PackStatus;
    use packtrack_core::InMemoryStore;

    fn header(names: &[&str]) -> Header {
        Header::new(names.iter().map(|s| s.to_string()).collect())
    }

    fn repo() -> (Arc<InMemoryStore>, SnapshotRepository) {
        let kv = Arc::new(InMemoryStore::new());
        let repo = SnapshotRepository::new(kv.clone());
        (kv, repo)
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (kv, repo) = repo();
        let mut store = OrderStore::new();
        store.import_batch(vec![vec!["a".into()], vec!["b".into()]], header(&["A"]));
        store.set_status(2, PackStatus::Packed);
        store.set_notes(1, "gift wrap");

        repo.save(&store).await.unwrap();
        assert_eq!(kv.get(COUNTER_KEY).await.unwrap().as_deref(), Some("3"));

        let restored = repo.load().await.unwrap().unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.next_id(), 3);
        assert_eq!(restored.get(1).unwrap().notes, "gift wrap");
        assert_eq!(restored.get(2).unwrap().status, PackStatus::Packed);

        let orders = restored.snapshot();
        assert!(orders[0].headers.shares_with(&orders[1].headers));
        assert_eq!(restored.current_header().unwrap().names(), &["A"]);
    }

    #[tokio::test]
    async fn test_load_empty_backend() {
        let (_, repo) = repo();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_accepts_browser_format() {
        let (kv, repo) = repo();
        let json = concat!(
            r#"[{"id":5,"rowData":["01/02/2024","Alice"],"headers":["Timestamp","Name"],"#,
            r#""status":"packed","notes":"","importTime":"2024-02-01T10:00:00.000Z"}]"#
        );
        kv.set(ORDERS_KEY, json).await.unwrap();

        let restored = repo.load().await.unwrap().unwrap();
        assert_eq!(restored.next_id(), 6);
        assert_eq!(restored.get(5).unwrap().field("Name"), Some("Alice"));
    }

    #[tokio::test]
    async fn test_invalid_data_is_an_error() {
        let (kv, repo) = repo();
        kv.set(ORDERS_KEY, "not json").await.unwrap();
        assert!(matches!(repo.load().await, Err(PersistenceError::Serialization(_))));

        kv.set(ORDERS_KEY, "[]").await.unwrap();
        kv.set(COUNTER_KEY, "abc").await.unwrap();
        assert!(matches!(repo.load().await, Err(PersistenceError::InvalidCounter(_))));
    }

    #[tokio::test]
    async fn test_clear_removes_both_keys() {
        let (kv, repo) = repo();
        repo.save(&OrderStore::new()).await.unwrap();
        repo.clear().await.unwrap();

        assert_eq!(kv.get(ORDERS_KEY).await.unwrap(), None);
        assert_eq!(kv.get(COUNTER_KEY).await.unwrap(), None);
    }
}
