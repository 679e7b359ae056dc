//! Repository layer for the local collection caches

pub mod cache;
pub mod file;
pub mod memory;

use std::sync::Arc;

pub use cache::CollectionCache;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::{
    config::CacheConfig,
    error::AppResult,
    models::{BookingRecord, FavoriteItem},
};

/// Synchronous string key/value storage (the browser's local storage, a
/// directory of files, an in-memory map, ...)
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Main repository struct holding one cache per collection
#[derive(Clone)]
pub struct Repository {
    pub bookings: CollectionCache<BookingRecord>,
    pub favorites: CollectionCache<FavoriteItem>,
}

impl Repository {
    /// Create a repository over the given backend
    pub fn new(store: Arc<dyn KeyValueStore>, config: &CacheConfig) -> Self {
        Self {
            bookings: CollectionCache::new(store.clone(), config.bookings_key.clone()),
            favorites: CollectionCache::new(store, config.favorites_key.clone()),
        }
    }

    /// File-backed repository rooted at `config.directory`
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Arc::new(FileStore::new(config.directory.clone())), config)
    }

    /// Forget every cached collection (used on sign-out)
    pub fn clear(&self) {
        self.bookings.clear();
        self.favorites.clear();
    }
}
