//! Key-value store abstraction backing the response cache

use async_trait::async_trait;
use std::time::Duration;

/// A string keyed store with per-entry expiry.
///
/// Implementations own expiry: a value put with a `ttl` must stop being
/// returned by `get` once the ttl has elapsed. Failures are not surfaced to
/// the caller; a broken store behaves like an empty one.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn put(&self, key: &str, value: String, ttl: Duration);
}
