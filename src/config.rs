//! Cache configuration structs.
//!
//! Each cache algorithm gets its own configuration type with public fields — simple
//! data to construct and pass to the matching `init` constructor. Validation (capacity
//! must be non-zero, `t` must be finite and non-negative, and so on) happens at
//! construction time in the cache's own constructor, not here: a `NonZeroUsize` field
//! alone cannot express "`t` must not be NaN", so there is no value in splitting
//! validation across two places.

pub mod adlfu;
pub mod arc;
pub mod dlfu;

pub use adlfu::AdlfuCacheConfig;
pub use arc::ArcCacheConfig;
pub use dlfu::DlfuCacheConfig;
