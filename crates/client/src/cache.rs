//! Expiring JSON cache on top of [`Storage`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::storage::Storage;

#[derive(Debug, Serialize, Deserialize)]
struct CachedEntry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

/// A cache whose entries become misses once their TTL has elapsed.
#[derive(Clone)]
pub struct TtlCache {
    storage: Arc<dyn Storage>,
    prefix: String,
}

impl TtlCache {
    pub fn new(storage: Arc<dyn Storage>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        self.put_at(key, value, ttl, Utc::now())
    }

    pub fn put_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> bool {
        let entry = CachedEntry {
            value,
            expires_at: now + ttl,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => self.storage.save_raw(&self.key(key), &json),
            Err(_) => false,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// The cached value if `now` is before its expiry. Expired or unreadable
    /// entries are removed.
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let full_key = self.key(key);
        let raw = self.storage.load_raw(&full_key)?;
        match serde_json::from_str::<CachedEntry<T>>(&raw) {
            Ok(entry) if now < entry.expires_at => Some(entry.value),
            _ => {
                self.storage.remove(&full_key);
                None
            }
        }
    }

    pub fn invalidate(&self, key: &str) {
        self.storage.remove(&self.key(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn cache() -> (Arc<MemoryStorage>, TtlCache) {
        let storage = Arc::new(MemoryStorage::new());
        let cache = TtlCache::new(storage.clone(), "test");
        (storage, cache)
    }

    #[test]
    fn fresh_entries_are_returned() {
        let (_, cache) = cache();
        let now = Utc::now();
        assert!(cache.put_at("feed", &vec![1, 2, 3], Duration::minutes(30), now));

        let hit: Option<Vec<i32>> = cache.get_at("feed", now + Duration::minutes(29));
        assert_eq!(hit, Some(vec![1, 2, 3]));
    }

    #[test]
    fn expired_entries_are_misses_and_get_evicted() {
        let (storage, cache) = cache();
        let now = Utc::now();
        cache.put_at("feed", &"payload", Duration::minutes(30), now);

        let miss: Option<String> = cache.get_at("feed", now + Duration::minutes(30));
        assert_eq!(miss, None);
        assert_eq!(storage.load_raw("test:feed"), None);
    }

    #[test]
    fn corrupt_entries_are_misses() {
        let (storage, cache) = cache();
        storage.save_raw("test:feed", "{not json");
        assert_eq!(cache.get::<String>("feed"), None);
        assert_eq!(storage.load_raw("test:feed"), None);
    }
}
