//! Bounded in-memory LRU store for raw response bodies.

use std::collections::{HashMap, VecDeque};

/// Fixed-capacity LRU mapping request URL to raw response bytes.
///
/// The recency queue and the entry map are always mutated together, so a
/// coordinator sharing one instance across tasks must guard the whole struct
/// behind a single mutex. The key at the front of the queue is the next
/// eviction candidate; keys inserted earlier evict first when recency ties.
///
/// A capacity of `0` is accepted: every `put` is dropped immediately and the
/// cache stays empty.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct HotCache {
    /// Maximum number of entries.
    capacity: usize,
    /// URL -> raw response body.
    entries: HashMap<String, Vec<u8>>,
    /// Recency order, least recently used at the front.
    order: VecDeque<String>,
}

impl HotCache {
    /// Creates an empty cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Returns the entry for `key` and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        if self.entries.contains_key(key) {
            self.touch(key);
        }
        self.entries.get(key).cloned()
    }

    /// Inserts or updates `key`, marking it most recently used.
    ///
    /// Updating an existing key never grows the cache. Inserting a new key at
    /// capacity evicts the least recently used entry first.
    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.contains_key(key) {
            self.entries.insert(String::from(key), value);
            self.touch(key);
            return;
        }

        if self.entries.len() == self.capacity
            && let Some(evicted) = self.order.pop_front()
        {
            tracing::debug!(key = %evicted, "evicting least recently used entry");
            self.entries.remove(&evicted);
        }

        self.entries.insert(String::from(key), value);
        self.order.push_back(String::from(key));
    }

    /// Membership test. Does not affect recency order.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drops `key` and its recency record. No-op when the key is absent.
    pub fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some()
            && let Some(pos) = self.order.iter().position(|k| k == key)
        {
            self.order.remove(pos);
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.entries.len(), self.order.len());
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured maximum entry count.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Moves `key` to the most-recently-used end of the queue.
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
            self.order.push_back(String::from(key));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn body(text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    #[test]
    fn test_get_returns_stored_value() {
        // Arrange
        let mut cache = HotCache::new(4);
        cache.put("a", body("alpha"));

        // Act
        let value = cache.get("a");

        // Assert
        assert_eq!(value, Some(body("alpha")));
    }

    #[test]
    fn test_get_missing_returns_none() {
        // Arrange
        let mut cache = HotCache::new(4);

        // Act & Assert
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        // Arrange
        let mut cache = HotCache::new(3);

        // Act
        for i in 0..10 {
            cache.put(&format!("key-{i}"), body("v"));
        }

        // Assert
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_eviction_is_insertion_ordered() {
        // Arrange
        let mut cache = HotCache::new(2);
        cache.put("a", body("1"));
        cache.put("b", body("2"));

        // Act: inserting a third key evicts the first inserted
        cache.put("c", body("3"));

        // Assert
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_get_refreshes_recency() {
        // Arrange: capacity 2, insert A then B, touch A via get
        let mut cache = HotCache::new(2);
        cache.put("a", body("1"));
        cache.put("b", body("2"));
        cache.get("a");

        // Act: inserting C must evict B, not A
        cache.put("c", body("3"));

        // Assert
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_put_existing_key_updates_without_eviction() {
        // Arrange
        let mut cache = HotCache::new(2);
        cache.put("a", body("old"));
        cache.put("b", body("2"));

        // Act
        cache.put("a", body("new"));

        // Assert: both keys retained, value replaced, "a" is now newest
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(body("new")));
        cache.put("c", body("3"));
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_contains_does_not_touch_recency() {
        // Arrange
        let mut cache = HotCache::new(2);
        cache.put("a", body("1"));
        cache.put("b", body("2"));

        // Act: contains must not promote "a"
        assert!(cache.contains("a"));
        cache.put("c", body("3"));

        // Assert
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_zero_capacity_drops_every_put() {
        // Arrange
        let mut cache = HotCache::new(0);

        // Act
        cache.put("a", body("1"));

        // Assert
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_remove_is_silent_for_missing_key() {
        // Arrange
        let mut cache = HotCache::new(2);
        cache.put("a", body("1"));

        // Act
        cache.remove("missing");
        cache.remove("a");

        // Assert
        assert!(cache.is_empty());
    }

    #[test]
    fn test_retained_entries_are_the_most_recently_touched() {
        // Arrange
        let mut cache = HotCache::new(3);
        for key in ["a", "b", "c", "d"] {
            cache.put(key, body(key));
        }

        // Act
        cache.get("b");
        cache.put("e", body("e"));

        // Assert: "c" was least recent after "b" was touched
        assert!(!cache.contains("a"));
        assert!(!cache.contains("c"));
        assert!(cache.contains("b"));
        assert!(cache.contains("d"));
        assert!(cache.contains("e"));
    }
}
