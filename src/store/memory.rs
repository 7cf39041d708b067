use crate::core::cache::CacheStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct StoredValue {
    value: String,
    expires_at: Instant,
}

/// In-memory store, entries vanish with the process
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, StoredValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.lock().await;
        store
            .values()
            .filter(|entry| entry.expires_at >= Instant::now())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut store = self.inner.lock().await;
        if let Some(entry) = store.get(key) {
            if entry.expires_at < Instant::now() {
                debug!("Cache entry expired for key: {}", key);
                store.remove(key);
                return None;
            }
            debug!("Cache HIT for key: {}", key);
            return Some(entry.value.clone());
        }
        debug!("Cache MISS for key: {}", key);
        None
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        let mut store = self.inner.lock().await;
        debug!("Cache PUT for key: {}", key);
        store.insert(key.to_string(), StoredValue { value, expires_at });
    }
}
