//! JSON collection cache over a key/value backend

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::KeyValueStore;
use crate::error::AppResult;

/// Last successfully fetched collection, kept as a fallback rendering source
pub struct CollectionCache<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for CollectionCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> CollectionCache<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the cached collection
    pub fn save(&self, records: &[T]) -> AppResult<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(&self.key, &json)?;
        tracing::debug!("Cached {} records under {}", records.len(), self.key);
        Ok(())
    }

    /// Cached collection, or an empty one when missing or unreadable.
    ///
    /// Failures are logged and treated as a cache miss.
    pub fn load(&self) -> Vec<T> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read cache {}: {}", self.key, e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Discarding corrupted cache {}: {}", self.key, e);
                Vec::new()
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!("Failed to clear cache {}: {}", self.key, e);
        }
    }
}
