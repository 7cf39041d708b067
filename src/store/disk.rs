use crate::core::cache::CacheStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

const PARTITION: &str = "responses";

#[derive(Serialize, Deserialize)]
struct StoredValue {
    value: String,
    expires_at: SystemTime,
}

/// Store persisted in a fjall keyspace so responses survive restarts.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create cache directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open cache at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open cache partition")?;
        Ok(Self {
            keyspace,
            partition,
        })
    }

    /// Syncs pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist cache")
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        let Some(raw) = self.partition.get(key)? else {
            debug!("Cache MISS for key: {}", key);
            return Ok(None);
        };
        let stored: StoredValue = serde_json::from_slice(&raw)?;
        if SystemTime::now() > stored.expires_at {
            debug!("Cache entry expired for key: {}", key);
            self.partition.remove(key)?;
            return Ok(None);
        }
        debug!("Cache HIT for key: {}", key);
        Ok(Some(stored.value))
    }

    fn store(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let stored = StoredValue {
            value,
            expires_at: SystemTime::now() + ttl,
        };
        self.partition.insert(key, serde_json::to_vec(&stored)?)?;
        debug!("Cache PUT for key: {}", key);
        Ok(())
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key) {
            Ok(value) => value,
            Err(e) => {
                debug!("DiskStore get error: {}", e);
                None
            }
        }
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) {
        if let Err(e) = self.store(key, value, ttl) {
            debug!("DiskStore put error: {}", e);
        }
    }
}
