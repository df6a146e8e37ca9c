use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-memory TTL cache for upstream API responses
///
/// Both external APIs are quota-bounded and their data moves slowly (current
/// weather, daily rates), so responses are held for a short TTL instead of
/// being re-fetched on every dashboard interaction. The place dataset itself
/// never goes through here: it is immutable and already in memory.
pub struct ResponseCache {
    cache: moka::future::Cache<String, Vec<u8>>,
}

impl ResponseCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Get a value from the cache
    ///
    /// A deserialization mismatch counts as a miss.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.cache.get(key).await?;

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::trace!("Cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                tracing::trace!("Cache entry for {} failed to decode: {}", key, e);
                None
            }
        }
    }

    /// Set a value in the cache
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.cache.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop a single entry
    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the current-weather payload of a city
    pub fn weather(city: &str) -> String {
        format!("weather:{}", city.to_lowercase())
    }

    /// Key for a currency pair rate
    pub fn rate(from: &str, to: &str) -> String {
        format!("rate:{}:{}", from.to_uppercase(), to.to_uppercase())
    }
}
