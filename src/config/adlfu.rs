//! Configuration for the Adaptive DLFU (ADLFU) cache.

use core::num::NonZeroUsize;

/// Configuration for an [`crate::AdlfuCache`].
///
/// There is no `t` field: the decay time constant is not a tuning parameter here, it is
/// the controller's output. `t` always starts at the nominal `T0 = 8.0` (see
/// [`crate::adlfu::T0`]) and is retuned from measured statistics on every `get`.
#[derive(Debug, Clone, Copy)]
pub struct AdlfuCacheConfig {
    /// Capacity of the primary (cached, valued) partition.
    pub size: NonZeroUsize,
    /// Capacity of the shadow (metadata-only) partition.
    pub msize: usize,
}
