use crate::cache::ResponseCache;
use crate::core::envelope::CacheEntry;
use crate::core::transport::{RequestDescriptor, Transport};
use crate::error::Result;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Per-call switches that do not take part in the request identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    pub no_cache: bool,
}

/// Sends requests through the transport, answering from the cache when it can.
///
/// There is no in-flight deduplication: two identical calls issued before the
/// first one completes both go to the network.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, cache: ResponseCache) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        call: CallOptions,
    ) -> Result<CacheEntry> {
        let use_cache = self.cache.is_enabled(call.no_cache);
        let digest = descriptor.fingerprint();

        if use_cache {
            if let Some(mut entry) = self.cache.read(&digest).await {
                debug!("Cache HIT for request: {}", digest);
                entry.from_cache = true;
                return Ok(entry);
            }
        }
        debug!("Cache MISS for request: {}", digest);

        let response = self
            .transport
            .send(&descriptor.url, &descriptor.options)
            .await?;
        debug!(status = response.status, "Received response from {}", descriptor.url);

        let text = response.text();
        let data = if text.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<Value>(text)? {
                Value::Null => None,
                value => Some(value),
            }
        };

        let entry = CacheEntry {
            digest,
            data,
            timestamp: Utc::now().timestamp_millis(),
            from_cache: false,
        };
        self.cache.write(&entry.digest, &entry).await;
        Ok(entry)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::cache::CacheStore;
    use crate::core::transport::{RequestOptions, TransportResponse};
    use crate::store::memory::MemoryStore;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Transport double that replays one body and records every call.
    pub(crate) struct MockTransport {
        body: Option<String>,
        pub(crate) calls: AtomicUsize,
        pub(crate) requests: Mutex<Vec<(String, RequestOptions)>>,
    }

    impl MockTransport {
        pub(crate) fn new(body: &str) -> Self {
            Self {
                body: Some(body.to_string()),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                body: None,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(
            &self,
            url: &str,
            options: &RequestOptions,
        ) -> anyhow::Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), options.clone()));
            match &self.body {
                Some(body) => Ok(TransportResponse {
                    status: 200,
                    body: body.clone(),
                }),
                None => Err(anyhow!("Connection refused")),
            }
        }
    }

    const BODY: &str = r#"{"data":{"latest":[{"quoteCurrency":"USD","quote":1.1}]}}"#;

    fn descriptor(query: &str) -> RequestDescriptor {
        RequestDescriptor {
            url: "https://swop.cx/graphql".to_string(),
            options: RequestOptions::graphql(query, "key"),
        }
    }

    fn fetcher(transport: Arc<MockTransport>, store: Option<Arc<MemoryStore>>, ttl: u64) -> Fetcher {
        let store = store.map(|s| s as Arc<dyn CacheStore>);
        Fetcher::new(transport, ResponseCache::new(store, Duration::from_secs(ttl)))
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let transport = Arc::new(MockTransport::new(BODY));
        let fetcher = fetcher(transport.clone(), Some(Arc::new(MemoryStore::new())), 60);
        let request = descriptor("query { latest { quote } }");

        let first = fetcher.execute(&request, CallOptions::default()).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(transport.call_count(), 1);

        let second = fetcher.execute(&request, CallOptions::default()).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(transport.call_count(), 1);

        assert_eq!(second.digest, first.digest);
        assert_eq!(second.data, first.data);
        assert_eq!(second.timestamp, first.timestamp);
    }

    #[tokio::test]
    async fn test_different_requests_use_different_slots() {
        let transport = Arc::new(MockTransport::new(BODY));
        let fetcher = fetcher(transport.clone(), Some(Arc::new(MemoryStore::new())), 60);

        let a = fetcher
            .execute(&descriptor("query { latest { quote } }"), CallOptions::default())
            .await
            .unwrap();
        let b = fetcher
            .execute(&descriptor("query { historical { quote } }"), CallOptions::default())
            .await
            .unwrap();
        assert_ne!(a.digest, b.digest);
        assert!(!b.from_cache);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_no_cache_skips_read_but_still_writes() {
        let transport = Arc::new(MockTransport::new(BODY));
        let store = Arc::new(MemoryStore::new());
        let fetcher = fetcher(transport.clone(), Some(store.clone()), 60);
        let request = descriptor("query { latest { quote } }");
        let bypass = CallOptions { no_cache: true };

        fetcher.execute(&request, CallOptions::default()).await.unwrap();
        let bypassed = fetcher.execute(&request, bypass).await.unwrap();
        assert!(!bypassed.from_cache);
        assert_eq!(transport.call_count(), 2);

        // The bypassing call refreshed the stored entry.
        let stored: CacheEntry =
            serde_json::from_str(&store.get(&bypassed.digest).await.unwrap()).unwrap();
        assert_eq!(stored.timestamp, bypassed.timestamp);
        assert!(!stored.from_cache);

        let cached = fetcher.execute(&request, CallOptions::default()).await.unwrap();
        assert!(cached.from_cache);
        assert_eq!(cached.timestamp, bypassed.timestamp);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let request = descriptor("query { latest { quote } }");

        let transport = Arc::new(MockTransport::new(BODY));
        let zero_ttl = fetcher(transport.clone(), Some(Arc::new(MemoryStore::new())), 0);
        for _ in 0..3 {
            let entry = zero_ttl.execute(&request, CallOptions::default()).await.unwrap();
            assert!(!entry.from_cache);
        }
        assert_eq!(transport.call_count(), 3);

        let transport = Arc::new(MockTransport::new(BODY));
        let no_store = fetcher(transport.clone(), None, 60);
        for _ in 0..3 {
            let entry = no_store.execute(&request, CallOptions::default()).await.unwrap();
            assert!(!entry.from_cache);
        }
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_body_maps_to_no_data() {
        let transport = Arc::new(MockTransport::new(""));
        let fetcher = fetcher(transport, None, 0);

        let entry = fetcher
            .execute(&descriptor("query { latest { quote } }"), CallOptions::default())
            .await
            .unwrap();
        assert!(entry.data.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = Arc::new(MockTransport::failing());
        let store = Arc::new(MemoryStore::new());
        let fetcher = fetcher(transport.clone(), Some(store), 60);

        let result = fetcher
            .execute(&descriptor("query { latest { quote } }"), CallOptions::default())
            .await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Connection refused");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_an_error() {
        let transport = Arc::new(MockTransport::new("<html>bad gateway</html>"));
        let fetcher = fetcher(transport, None, 0);

        let result = fetcher
            .execute(&descriptor("query { latest { quote } }"), CallOptions::default())
            .await;
        assert!(matches!(result, Err(crate::error::Error::Decode(_))));
    }
}
