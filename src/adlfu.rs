//! Adaptive DLFU: a decaying-LFU cache whose decay time constant `T` is retuned on
//! every access by a PID controller watching the cache's own count statistics.

use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::config::{AdlfuCacheConfig, DlfuCacheConfig};
use crate::dlfu::DlfuCache;
use crate::error::{CacheError, ConfigReason, Result};
use crate::pid::{LowPassFilter, PidController};

/// Nominal decay constant corresponding to zero control error: `u = 0 ⇒ T = T0`.
pub const T0: f64 = 8.0;

/// Stabilises the `error` computation against `filtered + target` landing on or near
/// zero.
const EPSILON: f64 = 1e-9;

/// A DLFU cache that retunes its own decay time constant from measured access
/// statistics, instead of using a fixed `T`.
#[derive(Debug, Clone)]
pub struct AdlfuCache<K, V> {
    inner: DlfuCache<K, V>,
    lpf: LowPassFilter,
    pid: PidController,
}

impl<K: Clone + Eq + Hash + Ord, V> AdlfuCache<K, V> {
    /// Creates a cache with primary capacity `size` and shadow capacity `msize`
    /// (defaults to `size`), starting at `T = T0` and adapting from there.
    pub fn new(size: usize, msize: Option<usize>) -> Result<Self> {
        let size = NonZeroUsize::new(size).ok_or(CacheError::InvalidConfig(ConfigReason::ZeroSize))?;
        Self::init(AdlfuCacheConfig {
            size,
            msize: msize.unwrap_or(size.get()),
        })
    }

    /// Creates a cache from an explicit configuration struct.
    pub fn init(config: AdlfuCacheConfig) -> Result<Self> {
        let size = config.size.get();
        let inner = DlfuCache::init(DlfuCacheConfig {
            size: config.size,
            msize: config.msize,
            t: T0,
            admission_filter: false,
        })?;
        tracing::debug!(size, msize = config.msize, t0 = T0, "constructing ADLFU cache");
        Ok(Self {
            inner,
            lpf: LowPassFilter::new(size as f64 / 8.0),
            pid: PidController::ziegler_nichols(1.0, size as f64 / 2.0, None, None),
        })
    }

    /// Reads `key`, retuning the decay time constant from the cache's current count
    /// statistics before delegating to the inner engine.
    pub fn get(&mut self, key: &K) -> Result<&V> {
        let mean = self.inner.count_avg();
        let count_sum = self.inner.raw_count_sum();
        let count_sum2 = self.inner.raw_count_sum2();
        let c = self.inner.c();
        let mean2 = if count_sum == 0.0 {
            0.0
        } else {
            count_sum2 / (count_sum * c)
        };
        let target = 0.75 * mean + 0.25 * mean2;

        let pre_access_count = self.inner.current_count(key);
        let filtered = self.lpf.update(pre_access_count, 1.0);

        let error = (filtered - target) / (filtered + target + EPSILON);
        let u = self.pid.update(error, 1.0);
        let new_t = T0 * (1.1 + u) / (1.1 - u);
        let old_t = self.inner.current_t();
        self.inner.set_t(new_t);

        // Retuning happens on every access, so this only logs when `T` has actually
        // drifted meaningfully — otherwise it would be per-operation noise, unlike
        // every other structural event this crate logs.
        if old_t > 0.0 && ((new_t - old_t) / old_t).abs() > 0.25 {
            tracing::trace!(old_t, new_t, "ADLFU decay constant drifted");
        }

        self.inner.get(key)
    }

    /// Stores `value` for `key`. Does not drive the controller.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.set(key, value);
    }

    /// Removes `key`. Does not drive the controller.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        self.inner.delete(key)
    }

    /// True if `key` currently has a stored value.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    /// Number of entries currently holding a value.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if no entries currently hold a value.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates the keys that currently hold a value.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    /// Drops every stored entry. Controller state (the low-pass filter and PID
    /// integrator) is left untouched, matching the inner engine's `clear` not touching
    /// counters.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Zeroes the inner engine's access counters.
    pub fn reset_stats(&mut self) {
        self.inner.reset_stats();
    }

    /// The decay time constant the controller currently holds.
    pub fn t(&self) -> f64 {
        self.inner.current_t()
    }

    /// Number of `get` calls made so far.
    pub fn get_count(&self) -> u64 {
        self.inner.get_count()
    }

    /// Number of `set` calls made so far.
    pub fn set_count(&self) -> u64 {
        self.inner.set_count()
    }

    /// Number of `delete` calls made so far.
    pub fn del_count(&self) -> u64 {
        self.inner.del_count()
    }

    /// Number of `get` calls that hit the primary partition.
    pub fn hit_count(&self) -> u64 {
        self.inner.hit_count()
    }

    /// Number of `get` calls that hit the shadow partition.
    pub fn mhit_count(&self) -> u64 {
        self.inner.mhit_count()
    }

    /// Fraction of `get` calls that hit the primary partition.
    pub fn hit_rate(&self) -> f64 {
        self.inner.hit_rate()
    }

    /// Fraction of `get` calls that hit the shadow partition.
    pub fn mhit_rate(&self) -> f64 {
        self.inner.mhit_rate()
    }

    /// Fraction of `get` calls that hit either partition.
    pub fn thit_rate(&self) -> f64 {
        self.inner.thit_rate()
    }

    /// Mean decayed count across the primary partition.
    pub fn count_avg(&self) -> f64 {
        self.inner.count_avg()
    }

    /// Variance of decayed counts across the primary partition.
    pub fn count_var(&self) -> f64 {
        self.inner.count_var()
    }
}
