#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Modules
//!
//! - [`dlfu`]: the decaying-LFU engine (and its LRU/LFU degenerate configurations)
//! - [`adlfu`]: the adaptive controller wrapping [`DlfuCache`]
//! - [`arc`]: the Adaptive Replacement Cache
//! - [`ipq`]: the indexed priority queue the decaying engines are built on
//! - [`lru_queue`]: the recency-ordered queue used at `t = 0.0`
//! - [`order_map`]: the arena-backed ordered map ARC and the LRU queue share
//! - [`pid`]: the PID controller and low-pass filter ADLFU tunes itself with
//! - [`config`]: per-algorithm configuration structs
//! - [`error`]: the shared [`CacheError`] type
//! - [`stats`]: the [`Stats`] trait common to all three caches

pub mod adlfu;
pub mod arc;
pub mod config;
pub mod dlfu;
pub mod error;
pub mod ipq;
pub mod lru_queue;
pub mod order_map;
pub mod pid;
pub mod stats;

pub use adlfu::AdlfuCache;
pub use arc::ArcCache;
pub use config::{AdlfuCacheConfig, ArcCacheConfig, DlfuCacheConfig};
pub use dlfu::DlfuCache;
pub use error::{CacheError, Result};
pub use stats::Stats;

use std::hash::Hash;

/// The keyed-mapping contract shared by every cache in this crate.
///
/// `get`/`set`/`delete` are the only operations that participate in a cache's eviction
/// policy; `contains` is a pure membership check and never counts as an access.
pub trait Cache<K, V> {
    /// Reads `key`, returning its stored value. Fails with [`CacheError::Miss`] if
    /// absent.
    fn get(&mut self, key: &K) -> Result<&V>;

    /// Stores `value` for `key`.
    fn set(&mut self, key: K, value: V);

    /// Removes `key`. Fails with [`CacheError::Miss`] if absent.
    fn delete(&mut self, key: &K) -> Result<()>;

    /// True if `key` currently has a stored value. Does not count as an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of entries currently holding a value.
    fn len(&self) -> usize;

    /// True if no entries currently hold a value.
    fn is_empty(&self) -> bool;

    /// Drops every stored entry.
    fn clear(&mut self);
}

impl<K: Clone + Eq + Hash + Ord, V> Cache<K, V> for DlfuCache<K, V> {
    fn get(&mut self, key: &K) -> Result<&V> {
        DlfuCache::get(self, key)
    }

    fn set(&mut self, key: K, value: V) {
        DlfuCache::set(self, key, value)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        DlfuCache::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        DlfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        DlfuCache::len(self)
    }

    fn is_empty(&self) -> bool {
        DlfuCache::is_empty(self)
    }

    fn clear(&mut self) {
        DlfuCache::clear(self)
    }
}

impl<K: Clone + Eq + Hash + Ord, V> Cache<K, V> for AdlfuCache<K, V> {
    fn get(&mut self, key: &K) -> Result<&V> {
        AdlfuCache::get(self, key)
    }

    fn set(&mut self, key: K, value: V) {
        AdlfuCache::set(self, key, value)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        AdlfuCache::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        AdlfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        AdlfuCache::len(self)
    }

    fn is_empty(&self) -> bool {
        AdlfuCache::is_empty(self)
    }

    fn clear(&mut self) {
        AdlfuCache::clear(self)
    }
}

impl<K: Clone + Eq + Hash, V> Cache<K, V> for ArcCache<K, V> {
    fn get(&mut self, key: &K) -> Result<&V> {
        ArcCache::get(self, key)
    }

    fn set(&mut self, key: K, value: V) {
        ArcCache::set(self, key, value)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        ArcCache::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        ArcCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn is_empty(&self) -> bool {
        ArcCache::is_empty(self)
    }

    fn clear(&mut self) {
        ArcCache::clear(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<C: Cache<&'static str, i32>>(mut cache: C) {
        cache.set("a", 1);
        assert!(cache.contains(&"a"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&"a").is_ok());
        assert!(cache.delete(&"a").is_ok());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn all_three_caches_satisfy_the_common_contract() {
        exercise(DlfuCache::new(4, None, 4.0).unwrap());
        exercise(AdlfuCache::new(4, None).unwrap());
        exercise(ArcCache::new(4).unwrap());
    }
}
