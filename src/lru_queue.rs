//! A pure-recency queue, used as the `T = 0` degenerate case of the decaying-LFU
//! engine (see [`crate::dlfu::Queue`]).
//!
//! At `T = 0` every decayed count collapses to the same value regardless of access
//! frequency, so ordering by score is equivalent to ordering by recency alone — and
//! recency can be tracked in O(1) with a plain ordered list instead of a heap. This
//! type exposes the same operation surface as [`crate::ipq::IndexedPriorityQueue`] (with
//! scores accepted but ignored) so [`crate::dlfu::Queue`] can dispatch to either backing
//! store without its callers caring which one is active.

use crate::error::{CacheError, Result};
use crate::order_map::OrderMap;

/// An ordered-by-recency queue: `set` always moves a key to the most-recently-used end,
/// and `peek_min`/`pop_min` always return the least-recently-used key.
#[derive(Debug, Clone, Default)]
pub struct LruQueue<K> {
    order: OrderMap<K, ()>,
}

impl<K: Clone + Eq + std::hash::Hash> LruQueue<K> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            order: OrderMap::new(),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.order.contains(key)
    }

    /// Always `None`: recency order carries no numeric score.
    pub fn get(&self, _key: &K) -> Option<f64> {
        None
    }

    /// Iterates the keys currently stored, from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.keys_ordered()
    }

    /// Marks `key` as most recently used, inserting it if new. `score` is accepted for
    /// interface parity with the heap-backed queue and ignored.
    pub fn set(&mut self, key: K, _score: f64) {
        if self.order.contains(&key) {
            self.order.touch(&key);
        } else {
            self.order.push_back(key, ());
        }
    }

    /// Removes `key`. Fails with [`CacheError::Miss`] if absent.
    pub fn delete(&mut self, key: &K) -> Result<f64> {
        self.order.remove(key).map(|()| 0.0).ok_or(CacheError::Miss)
    }

    /// The least-recently-used key, without removing it. Fails with
    /// [`CacheError::Empty`] if the queue is empty.
    pub fn peek_min(&self) -> Result<(&K, f64)> {
        self.order
            .front_key()
            .map(|k| (k, 0.0))
            .ok_or(CacheError::Empty)
    }

    /// Removes and returns the least-recently-used key. Fails with
    /// [`CacheError::Empty`] if the queue is empty.
    pub fn pop_min(&mut self) -> Result<(K, f64)> {
        self.order.pop_front().map(|(k, ())| (k, 0.0)).ok_or(CacheError::Empty)
    }

    /// Evicts the least-recently-used key and inserts `key` as most-recently-used,
    /// returning the evicted key. Fails with [`CacheError::Empty`] if the queue is
    /// empty. `score` is accepted for interface parity and ignored.
    pub fn swap_min(&mut self, key: K, _score: f64) -> Result<(K, f64)> {
        let (old, ()) = self.order.pop_front().ok_or(CacheError::Empty)?;
        self.order.push_back(key, ());
        Ok((old, 0.0))
    }

    /// Replaces `old_key` with `key`, inserted as most-recently-used. Fails with
    /// [`CacheError::Miss`] if `old_key` is absent. `score` is accepted for interface
    /// parity and ignored.
    pub fn swap_key(&mut self, key: K, _score: f64, old_key: &K) -> Result<(K, f64)> {
        self.order.remove(old_key).ok_or(CacheError::Miss)?;
        self.order.push_back(key, ());
        Ok((old_key.clone(), 0.0))
    }

    /// No-op: recency order carries no score to rescale.
    pub fn scale(&mut self, _factor: f64) {}
}
