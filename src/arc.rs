//! Adaptive Replacement Cache: a four-list cache that self-tunes the balance between
//! recency (`T1`/`B1`) and frequency (`T2`/`B2`) from ghost-list hits.

use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::config::ArcCacheConfig;
use crate::error::{CacheError, ConfigReason, Result};
use crate::order_map::OrderMap;

/// An Adaptive Replacement Cache.
///
/// `T1`/`T2` hold live values; `B1`/`B2` are ghost lists remembering recently evicted
/// keys (no values) so the cache can tell whether its workload favours recency or
/// frequency. `p` is the learned target size of `T1` and is never reset once set.
///
/// This is a look-aside variant: `delete` can leave `T1`/`T2` short of `p`, unlike the
/// closed-world cache the original ARC paper describes. The capacity invariants are
/// therefore upper bounds, not exact equalities.
#[derive(Debug, Clone)]
pub struct ArcCache<K, V> {
    size: usize,
    p: usize,
    t1: OrderMap<K, V>,
    t2: OrderMap<K, V>,
    b1: OrderMap<K, ()>,
    b2: OrderMap<K, ()>,

    get_count: u64,
    set_count: u64,
    del_count: u64,
    hit_count: u64,
}

impl<K: Clone + Eq + Hash, V> ArcCache<K, V> {
    /// Creates a cache with primary capacity `size` (each ghost list can also hold up
    /// to `size` keys).
    pub fn new(size: usize) -> Result<Self> {
        let size = NonZeroUsize::new(size).ok_or(CacheError::InvalidConfig(ConfigReason::ZeroSize))?;
        Self::init(ArcCacheConfig { size })
    }

    /// Creates a cache from an explicit configuration struct.
    pub fn init(config: ArcCacheConfig) -> Result<Self> {
        let size = config.size.get();
        tracing::debug!(size, "constructing ARC cache");
        Ok(Self {
            size,
            p: 0,
            t1: OrderMap::new(),
            t2: OrderMap::new(),
            b1: OrderMap::new(),
            b2: OrderMap::new(),
            get_count: 0,
            set_count: 0,
            del_count: 0,
            hit_count: 0,
        })
    }

    /// Reads `key`. A hit in `T1` promotes it to `T2`; a hit in `T2` just refreshes its
    /// recency. Fails with [`CacheError::Miss`] if `key` is in neither list.
    pub fn get(&mut self, key: &K) -> Result<&V> {
        self.get_count += 1;
        if self.t1.contains(key) {
            self.hit_count += 1;
            let value = self.t1.remove(key).expect("contains implies present");
            self.t2.push_back(key.clone(), value);
            return Ok(self.t2.get(key).expect("just inserted"));
        }
        if self.t2.contains(key) {
            self.hit_count += 1;
            self.t2.touch(key);
            return Ok(self.t2.get(key).expect("contains implies present"));
        }
        Err(CacheError::Miss)
    }

    /// Stores `value` for `key`, running the full ARC admission logic: a ghost hit
    /// adapts `p` and replaces before promoting to `T2`; a cold miss inserts into `T1`,
    /// first making room per the capacity rules.
    pub fn set(&mut self, key: K, value: V) {
        self.set_count += 1;

        if self.t1.contains(&key) {
            self.t1.remove(&key);
            self.t2.push_back(key, value);
            return;
        }
        if self.t2.contains(&key) {
            self.t2.push_back(key, value);
            return;
        }
        if self.b1.contains(&key) {
            let delta = (self.b2.len() as f64 / self.b1.len() as f64).max(1.0);
            let old_p = self.p;
            self.p = ((self.p as f64 + delta).round() as usize).min(self.size);
            tracing::trace!(old_p, new_p = self.p, ghost = "B1", "ARC p adjustment");
            self.replace(false);
            self.b1.remove(&key);
            self.t2.push_back(key, value);
            return;
        }
        if self.b2.contains(&key) {
            let delta = (self.b1.len() as f64 / self.b2.len() as f64).max(1.0);
            let old_p = self.p;
            self.p = self.p.saturating_sub(delta.round() as usize);
            tracing::trace!(old_p, new_p = self.p, ghost = "B2", "ARC p adjustment");
            self.replace(true);
            self.b2.remove(&key);
            self.t2.push_back(key, value);
            return;
        }

        // Cold miss.
        let t1b1 = self.t1.len() + self.b1.len();
        let total = self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len();
        if t1b1 == self.size {
            if self.t1.len() < self.size {
                self.b1.pop_front();
                self.replace(false);
            } else {
                self.t1.pop_front();
            }
        } else if t1b1 < self.size && total >= self.size {
            if total == 2 * self.size {
                self.b2.pop_front();
            }
            self.replace(false);
        }
        self.t1.push_back(key, value);
    }

    /// Moves the LRU entry out of `T1` or `T2` into its matching ghost list, preferring
    /// `T1` when it has grown past its target `p` (or the key that triggered this
    /// replace came from `B2` and `T1` is exactly at `p`).
    fn replace(&mut self, key_in_b2: bool) {
        if self.t1.len() + self.t2.len() < self.size {
            return;
        }
        let prefer_t1 = self.t1.len() > 0
            && (self.t1.len() > self.p || (self.t1.len() == self.p && self.p > 0 && key_in_b2));
        if prefer_t1 {
            if let Some((k, _v)) = self.t1.pop_front() {
                self.b1.push_back(k, ());
            }
        } else if let Some((k, _v)) = self.t2.pop_front() {
            self.b2.push_back(k, ());
        }
    }

    /// Removes `key` from whichever live list holds it, demoting it to the matching
    /// ghost list. Fails with [`CacheError::Miss`] if absent from both `T1` and `T2`.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        self.del_count += 1;
        if let Some(_value) = self.t1.remove(key) {
            self.b1.push_back(key.clone(), ());
            return Ok(());
        }
        if let Some(_value) = self.t2.remove(key) {
            self.b2.push_back(key.clone(), ());
            return Ok(());
        }
        Err(CacheError::Miss)
    }

    /// True if `key` currently has a stored value (in `T1` or `T2`).
    pub fn contains(&self, key: &K) -> bool {
        self.t1.contains(key) || self.t2.contains(key)
    }

    /// Number of entries currently holding a value.
    pub fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// True if no entries currently hold a value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the keys that currently hold a value.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.t1.keys_ordered().chain(self.t2.keys_ordered())
    }

    /// Drops every stored entry and ghost, resetting `p` to `0`.
    pub fn clear(&mut self) {
        self.t1 = OrderMap::new();
        self.t2 = OrderMap::new();
        self.b1 = OrderMap::new();
        self.b2 = OrderMap::new();
        self.p = 0;
    }

    /// Zeroes the access counters.
    pub fn reset_stats(&mut self) {
        self.get_count = 0;
        self.set_count = 0;
        self.del_count = 0;
        self.hit_count = 0;
    }

    /// The cache's current learned target size for `T1`.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Number of `get` calls made so far.
    pub fn get_count(&self) -> u64 {
        self.get_count
    }

    /// Number of `set` calls made so far.
    pub fn set_count(&self) -> u64 {
        self.set_count
    }

    /// Number of `delete` calls made so far.
    pub fn del_count(&self) -> u64 {
        self.del_count
    }

    /// Number of `get` calls that hit `T1` or `T2`.
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Fraction of `get` calls that hit. `NaN` if no gets have happened yet.
    pub fn hit_rate(&self) -> f64 {
        if self.get_count == 0 {
            f64::NAN
        } else {
            self.hit_count as f64 / self.get_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_size() {
        assert!(matches!(
            ArcCache::<i32, i32>::new(0),
            Err(CacheError::InvalidConfig(ConfigReason::ZeroSize))
        ));
    }

    #[test]
    fn cold_miss_then_hit() {
        let mut cache = ArcCache::new(4).unwrap();
        assert_eq!(cache.get(&"a"), Err(CacheError::Miss));
        cache.set("a", 1);
        assert_eq!(cache.get(&"a"), Ok(&1));
        assert_eq!(cache.hit_count(), 1);
    }

    #[test]
    fn t1_hit_promotes_to_t2() {
        let mut cache = ArcCache::new(4).unwrap();
        cache.set("a", 1);
        assert!(cache.get(&"a").is_ok());
        assert_eq!(cache.t2.front_key(), Some(&"a"));
        assert!(cache.t1.is_empty());
    }

    #[test]
    fn s4_b1_ghost_hit_adapts_p_and_restores_value() {
        let mut cache = ArcCache::new(2).unwrap();
        cache.set(1, "one");
        assert!(cache.get(&1).is_ok()); // 1 -> T2
        cache.set(2, "two"); // T1=[2]
        cache.set(3, "three"); // T1+T2 full -> replace ghosts 2 into B1, T1=[3]
        assert!(cache.b1.contains(&2));

        cache.set(2, "two-again"); // B1 hit
        assert!(cache.p() >= 1);
        assert!(cache.p() <= 2);
        assert!(!cache.b1.contains(&2));
        assert_eq!(cache.get(&2), Ok(&"two-again"));
    }

    #[test]
    fn delete_demotes_to_ghost_list() {
        let mut cache = ArcCache::new(4).unwrap();
        cache.set("a", 1);
        assert!(cache.delete(&"a").is_ok());
        assert!(!cache.contains(&"a"));
        assert!(cache.b1.contains(&"a"));
        assert!(matches!(cache.delete(&"a"), Err(CacheError::Miss)));
    }

    #[test]
    fn len_and_clear() {
        let mut cache = ArcCache::new(4).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.p(), 0);
    }
}
