//! Configuration for the Adaptive Replacement Cache (ARC).

use core::num::NonZeroUsize;

/// Configuration for an [`crate::ArcCache`].
///
/// ARC has no decay time constant or shadow-size knob: its two ghost lists are each
/// sized to `size`, and its `T1`/`T2` balance point `p` is learned from the workload
/// rather than configured.
#[derive(Debug, Clone, Copy)]
pub struct ArcCacheConfig {
    /// Capacity of the primary partition (`|T1| + |T2|`); each ghost list can also hold
    /// up to this many keys.
    pub size: NonZeroUsize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_plain_data() {
        let config = ArcCacheConfig {
            size: NonZeroUsize::new(10).unwrap(),
        };
        assert_eq!(config.size.get(), 10);
    }
}
