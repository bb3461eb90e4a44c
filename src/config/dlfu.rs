//! Configuration for the Decaying Least-Frequently-Used (DLFU) cache.

use core::num::NonZeroUsize;

/// Configuration for a [`crate::DlfuCache`].
///
/// Unlike the degenerate single-purpose configs this crate's ancestor shipped one per
/// algorithm, a single `DlfuCacheConfig` covers LRU (`t = 0.0`), LFU (`t =
/// f64::INFINITY`) and the general decaying case, since they are all the same engine
/// parameterised differently. Validation (non-zero size, finite non-negative `t`)
/// happens at [`crate::DlfuCache::init`], not here — a config struct is just data.
#[derive(Debug, Clone, Copy)]
pub struct DlfuCacheConfig {
    /// Capacity of the primary (cached, valued) partition.
    pub size: NonZeroUsize,
    /// Capacity of the shadow (metadata-only) partition.
    pub msize: usize,
    /// Decay time constant, in units of "full-cache accesses". `0.0` degenerates to
    /// LRU, `f64::INFINITY` degenerates to undecayed LFU.
    pub t: f64,
    /// Adds a floor check rejecting brand-new keys whose initial score undercuts the
    /// current primary minimum. Off by default; forced off when `t == 0.0`.
    pub admission_filter: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_plain_data() {
        let a = DlfuCacheConfig {
            size: NonZeroUsize::new(10).unwrap(),
            msize: 10,
            t: 4.0,
            admission_filter: false,
        };
        let b = a;
        assert_eq!(a.size, b.size);
        assert_eq!(a.t, b.t);
    }
}
