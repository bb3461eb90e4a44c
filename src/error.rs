//! Error types shared by every cache and queue in this crate.
//!
//! All operations are synchronous and local: an error is reported to the immediate
//! caller and never retried internally. Statistics counters are never rolled back when
//! an operation fails — a `get` miss still increments `get_count`.

use std::fmt;

/// Errors produced by the indexed queues and the caches built on top of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// `get`/`delete` of a key with no stored value.
    #[error("key not present in cache")]
    Miss,

    /// `peek_min`/`pop_min`/`swap_min` on an empty indexed queue.
    #[error("queue is empty")]
    Empty,

    /// Construction-time validation failure (non-positive capacity, NaN decay
    /// constant, and so on).
    #[error("invalid cache configuration: {0}")]
    InvalidConfig(ConfigReason),
}

/// A human-readable reason an `InvalidConfig` error was raised.
///
/// Kept as a small enum rather than a bare `String` so callers can match on the
/// specific failure if they want to, while `Display` still reads like a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigReason {
    /// `size` (primary capacity) must be greater than zero.
    ZeroSize,
    /// The decay time constant `T` must not be NaN.
    NonFiniteT,
    /// The decay time constant `T` must not be negative.
    NegativeT,
}

impl fmt::Display for ConfigReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigReason::ZeroSize => write!(f, "size must be greater than zero"),
            ConfigReason::NonFiniteT => write!(f, "T must not be NaN"),
            ConfigReason::NegativeT => write!(f, "T must not be negative"),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CacheError>;
