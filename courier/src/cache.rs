//! Bounded response cache with TTL expiry and FIFO eviction.
//!
//! The store is policy-free: eligibility (GET-like method, successful
//! status) is the executor's decision, exactly like the storage backends
//! in a tiered cache know nothing about what gets written to them. The
//! store only enforces capacity and expiry.
//!
//! Eviction is strict insertion order — first in, first out — not LRU.
//! Reads do not touch an entry's position; re-inserting an existing key
//! refreshes the entry and moves it to the back of the order.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use courier_core::{CachedResponse, ClientResponse, Fingerprint};
use tracing::debug;

struct CacheInner {
    entries: HashMap<Fingerprint, CachedResponse>,
    /// Insertion order of the keys in `entries`; the front is evicted first.
    order: VecDeque<Fingerprint>,
}

/// Bounded key→response store.
///
/// All operations take the internal lock for the duration of one map
/// mutation only — never across an await point — so a slow transport call
/// elsewhere can never block cache readers.
pub struct CacheStore {
    max_entries: usize,
    inner: Mutex<CacheInner>,
}

impl CacheStore {
    /// Creates a store bounded to `max_entries` entries.
    ///
    /// A capacity of zero disables storage entirely: every `put` is a
    /// no-op and every `get` misses.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Looks up a fresh entry, returning an independent copy of the
    /// response.
    ///
    /// Expiry is checked lazily here: an expired entry is removed and
    /// treated as absent.
    pub fn get(&self, key: &Fingerprint) -> Option<ClientResponse> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                debug!(%key, "cache entry expired");
                inner.entries.remove(key);
                inner.order.retain(|k| k != key);
                None
            }
            Some(entry) => Some(entry.response().clone()),
            None => None,
        }
    }

    /// Stores a response under `key` with the given TTL.
    ///
    /// At capacity, the oldest-inserted entry is evicted first. Inserting
    /// over an existing key replaces the entry and counts as a fresh
    /// insertion for eviction order.
    pub fn put(&self, key: Fingerprint, response: ClientResponse, ttl: Duration) {
        if self.max_entries == 0 {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.entries.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        } else if inner.entries.len() >= self.max_entries {
            if let Some(oldest) = inner.order.pop_front() {
                debug!(key = %oldest, "evicting oldest cache entry");
                inner.entries.remove(&oldest);
            }
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(key, CachedResponse::new(response, ttl));
    }

    /// Removes the entry under `key`, if present.
    pub fn remove(&self, key: &Fingerprint) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.entries.remove(key).is_some() {
            inner.order.retain(|k| k != key);
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::RequestDescriptor;
    use http::{Method, StatusCode};

    fn key(path: &str) -> Fingerprint {
        RequestDescriptor::builder(Method::GET, format!("https://example.com/{path}"))
            .build()
            .fingerprint()
    }

    fn ok(body: &'static str) -> ClientResponse {
        ClientResponse::new(StatusCode::OK, http::HeaderMap::new(), body)
    }

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn get_returns_stored_response() {
        let store = CacheStore::new(10);
        store.put(key("a"), ok("hello"), TTL);
        let hit = store.get(&key("a")).expect("entry should be present");
        assert_eq!(hit.body(), "hello");
        assert!(store.get(&key("b")).is_none());
    }

    #[test]
    fn expired_entries_are_absent_and_removed() {
        let store = CacheStore::new(10);
        store.put(key("a"), ok("hello"), Duration::ZERO);
        assert_eq!(store.len(), 1);
        assert!(store.get(&key("a")).is_none());
        assert_eq!(store.len(), 0, "expired entry should be removed on read");
    }

    #[test]
    fn eviction_is_oldest_inserted_first() {
        let store = CacheStore::new(3);
        store.put(key("a"), ok("a"), TTL);
        store.put(key("b"), ok("b"), TTL);
        store.put(key("c"), ok("c"), TTL);

        // Reading "a" must not protect it: this is FIFO, not LRU.
        assert!(store.get(&key("a")).is_some());

        store.put(key("d"), ok("d"), TTL);
        assert_eq!(store.len(), 3);
        assert!(store.get(&key("a")).is_none(), "oldest entry evicted");
        assert!(store.get(&key("b")).is_some());
        assert!(store.get(&key("c")).is_some());
        assert!(store.get(&key("d")).is_some());
    }

    #[test]
    fn reinsert_refreshes_entry_and_order() {
        let store = CacheStore::new(2);
        store.put(key("a"), ok("a1"), TTL);
        store.put(key("b"), ok("b"), TTL);
        store.put(key("a"), ok("a2"), TTL);

        // "b" is now the oldest insertion; a third key evicts it.
        store.put(key("c"), ok("c"), TTL);
        assert!(store.get(&key("b")).is_none());
        assert_eq!(store.get(&key("a")).unwrap().body(), "a2");
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let store = CacheStore::new(0);
        store.put(key("a"), ok("a"), TTL);
        assert!(store.get(&key("a")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn clear_empties_the_store() {
        let store = CacheStore::new(10);
        store.put(key("a"), ok("a"), TTL);
        store.put(key("b"), ok("b"), TTL);
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(&key("a")).is_none());
    }

    #[test]
    fn returned_copy_is_independent_of_the_stored_entry() {
        let store = CacheStore::new(10);
        store.put(key("a"), ok("hello"), TTL);
        let first = store.get(&key("a")).unwrap();
        drop(first);
        let second = store.get(&key("a")).unwrap();
        assert_eq!(second.body(), "hello");
    }
}
