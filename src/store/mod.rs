pub mod disk;
pub mod memory;

use crate::core::cache::CacheStore;
use crate::core::config::AppConfig;
use anyhow::Result;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::warn;

/// The store selected by the configuration.
#[derive(Clone)]
pub enum Store {
    Memory(Arc<MemoryStore>),
    Disk(Arc<DiskStore>),
}

impl Store {
    /// Opens the configured store.
    ///
    /// A persistent store that cannot be opened falls back to memory so the
    /// client keeps working, just without surviving restarts.
    pub fn open(config: &AppConfig) -> Self {
        if !config.cache.persist {
            return Store::Memory(Arc::new(MemoryStore::new()));
        }

        match config
            .default_data_path()
            .and_then(|path| DiskStore::open(&path.join("cache")))
        {
            Ok(store) => Store::Disk(Arc::new(store)),
            Err(e) => {
                warn!("Falling back to in-memory cache: {e:#}");
                Store::Memory(Arc::new(MemoryStore::new()))
            }
        }
    }

    pub fn as_cache_store(&self) -> Arc<dyn CacheStore> {
        match self {
            Store::Memory(store) => store.clone(),
            Store::Disk(store) => store.clone(),
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Store::Disk(_))
    }

    pub fn flush(&self) -> Result<()> {
        match self {
            Store::Memory(_) => Ok(()),
            Store::Disk(store) => store.flush(),
        }
    }
}
