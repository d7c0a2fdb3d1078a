//! In-memory key/value cache with a fixed time-to-live.
//!
//! Every consumer owns its own instance with its own TTL. Expired entries are
//! treated as absent by [`TtlCache::get`] but stay in memory until they are
//! overwritten, deleted, or removed by [`TtlCache::clean_expired`].

use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A stored value and the moment it was inserted.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_valid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.inserted_at < ttl
    }
}

/// Thread-safe TTL cache.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache backed by the system clock.
    pub fn new(ttl: std::time::Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache that reads time from `clock`.
    pub fn with_clock(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up `key`. Returns `None` if absent or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        self.lock()
            .get(key)
            .filter(|entry| entry.is_valid(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
        };
        self.lock().insert(key, entry);
    }

    /// Remove `key`. Returns `true` if an entry (expired or not) was removed.
    pub fn delete(&self, key: &K) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drop every expired entry and return how many were removed.
    pub fn clean_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_valid(now, self.ttl));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Swept expired cache entries");
        }
        removed
    }

    /// Number of physically stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn ttl(&self) -> std::time::Duration {
        self.ttl.to_std().unwrap_or(std::time::Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const DAY: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

    fn cache_with_clock(ttl: std::time::Duration) -> (TtlCache<String, String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = TtlCache::with_clock(ttl, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_get_missing_key() {
        let (cache, _) = cache_with_clock(DAY);
        assert_eq!(cache.get(&"nope".to_string()), None);
    }

    #[test]
    fn test_set_then_get() {
        let (cache, _) = cache_with_clock(DAY);
        cache.set("k".to_string(), "v".to_string());
        assert_eq!(cache.get(&"k".to_string()), Some("v".to_string()));
    }

    #[test]
    fn test_set_overwrites_and_refreshes_timestamp() {
        let (cache, clock) = cache_with_clock(DAY);
        cache.set("k".to_string(), "old".to_string());
        clock.advance(Duration::hours(20));
        cache.set("k".to_string(), "new".to_string());
        clock.advance(Duration::hours(20));

        assert_eq!(cache.get(&"k".to_string()), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hit_just_before_expiry() {
        let (cache, clock) = cache_with_clock(DAY);
        cache.set("k".to_string(), "v".to_string());
        clock.advance(Duration::hours(23) + Duration::minutes(59));
        assert_eq!(cache.get(&"k".to_string()), Some("v".to_string()));
    }

    #[test]
    fn test_miss_just_after_expiry() {
        let (cache, clock) = cache_with_clock(DAY);
        cache.set("k".to_string(), "v".to_string());
        clock.advance(Duration::hours(24) + Duration::minutes(1));
        assert_eq!(cache.get(&"k".to_string()), None);
    }

    #[test]
    fn test_miss_exactly_at_ttl() {
        let (cache, clock) = cache_with_clock(DAY);
        cache.set("k".to_string(), "v".to_string());
        clock.advance(Duration::hours(24));
        assert_eq!(cache.get(&"k".to_string()), None);
    }

    #[test]
    fn test_expired_entry_stays_until_swept() {
        let (cache, clock) = cache_with_clock(std::time::Duration::from_secs(60));
        cache.set("stale".to_string(), "v".to_string());
        clock.advance(Duration::seconds(30));
        cache.set("fresh".to_string(), "v".to_string());
        clock.advance(Duration::seconds(45));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.clean_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&"fresh".to_string()).is_some());
    }

    #[test]
    fn test_clean_expired_nothing_to_do() {
        let (cache, _) = cache_with_clock(DAY);
        cache.set("k".to_string(), "v".to_string());
        assert_eq!(cache.clean_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_delete() {
        let (cache, _) = cache_with_clock(DAY);
        cache.set("k".to_string(), "v".to_string());
        assert!(cache.delete(&"k".to_string()));
        assert!(!cache.delete(&"k".to_string()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let (cache, _) = cache_with_clock(DAY);
        cache.set("a".to_string(), "1".to_string());
        cache.set("b".to_string(), "2".to_string());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn test_independent_instances_have_independent_ttls() {
        let clock = Arc::new(ManualClock::default());
        let short: TtlCache<&str, u32> =
            TtlCache::with_clock(std::time::Duration::from_secs(300), clock.clone());
        let long: TtlCache<&str, u32> = TtlCache::with_clock(DAY, clock.clone());

        short.set("k", 1);
        long.set("k", 2);
        clock.advance(Duration::minutes(10));

        assert_eq!(short.get(&"k"), None);
        assert_eq!(long.get(&"k"), Some(2));
    }

    #[test]
    fn test_ttl_accessor() {
        let cache: TtlCache<String, String> = TtlCache::new(DAY);
        assert_eq!(cache.ttl(), DAY);
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = Arc::new(TtlCache::<usize, usize>::new(DAY));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.set(t * 100 + i, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
    }
}
