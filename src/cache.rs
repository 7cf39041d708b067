use crate::core::cache::CacheStore;
use crate::core::envelope::CacheEntry;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Response cache layered over an optional [`CacheStore`].
///
/// Entries are stored as JSON text under their request fingerprint. Expiry is
/// left entirely to the store.
#[derive(Clone)]
pub struct ResponseCache {
    store: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Option<Arc<dyn CacheStore>>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn disabled() -> Self {
        Self::new(None, Duration::ZERO)
    }

    /// Whether writes reach the store at all.
    pub fn is_configured(&self) -> bool {
        self.store.is_some() && !self.ttl.is_zero()
    }

    /// Whether a call may be answered from the store.
    pub fn is_enabled(&self, no_cache: bool) -> bool {
        self.is_configured() && !no_cache
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn read(&self, fingerprint: &str) -> Option<CacheEntry> {
        if !self.is_configured() {
            return None;
        }
        let store = self.store.as_ref()?;
        let text = store.get(fingerprint).await?;
        match serde_json::from_str::<CacheEntry>(&text) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Ignoring unreadable cache entry {}: {}", fingerprint, e);
                None
            }
        }
    }

    pub async fn write(&self, fingerprint: &str, entry: &CacheEntry) {
        if !self.is_configured() {
            return;
        }
        let Some(store) = self.store.as_ref() else {
            return;
        };
        match serde_json::to_string(entry) {
            Ok(text) => store.put(fingerprint, text, self.ttl).await,
            Err(e) => debug!("Failed to serialize cache entry {}: {}", fingerprint, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn entry(digest: &str) -> CacheEntry {
        CacheEntry {
            digest: digest.to_string(),
            data: Some(json!({"data": {"latest": [{"quote": 1.1}]}})),
            timestamp: 1_600_000_000_000,
            from_cache: false,
        }
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(Some(store), Duration::from_secs(60));

        assert!(cache.read("fp").await.is_none());
        cache.write("fp", &entry("fp")).await;
        assert_eq!(cache.read("fp").await, Some(entry("fp")));
        assert!(cache.read("other").await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(Some(store.clone()), Duration::ZERO);

        assert!(!cache.is_enabled(false));
        cache.write("fp", &entry("fp")).await;
        assert!(cache.read("fp").await.is_none());
        assert!(store.get("fp").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_store_disables_cache() {
        let cache = ResponseCache::new(None, Duration::from_secs(60));

        assert!(!cache.is_enabled(false));
        cache.write("fp", &entry("fp")).await;
        assert!(cache.read("fp").await.is_none());
    }

    #[tokio::test]
    async fn test_no_cache_flag_only_affects_reads() {
        let cache = ResponseCache::new(Some(Arc::new(MemoryStore::new())), Duration::from_secs(60));
        assert!(cache.is_enabled(false));
        assert!(!cache.is_enabled(true));
        assert!(cache.is_configured());
    }

    #[tokio::test]
    async fn test_unparseable_entry_reads_as_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("fp", "not json".to_string(), Duration::from_secs(60))
            .await;
        let cache = ResponseCache::new(Some(store), Duration::from_secs(60));

        assert!(cache.read("fp").await.is_none());
    }
}
