//! The statistics contract common to every cache in this crate.

/// Access-counter statistics shared by [`crate::DlfuCache`], [`crate::AdlfuCache`] and
/// [`crate::ArcCache`].
///
/// Richer, engine-specific statistics (decayed-count moments, shadow-partition
/// variants) are exposed as inherent methods instead of trait methods, since ARC has no
/// equivalent concept to report.
pub trait Stats {
    /// Number of `get` calls made so far.
    fn get_count(&self) -> u64;

    /// Number of `set` calls made so far.
    fn set_count(&self) -> u64;

    /// Number of `delete` calls made so far.
    fn del_count(&self) -> u64;

    /// Number of `get` calls that returned a stored value.
    fn hit_count(&self) -> u64;

    /// Fraction of `get` calls that returned a stored value. `NaN` if no gets have
    /// happened yet.
    fn hit_rate(&self) -> f64;
}

impl<K, V> Stats for crate::DlfuCache<K, V>
where
    K: Clone + Eq + std::hash::Hash + Ord,
{
    fn get_count(&self) -> u64 {
        self.get_count()
    }

    fn set_count(&self) -> u64 {
        self.set_count()
    }

    fn del_count(&self) -> u64 {
        self.del_count()
    }

    fn hit_count(&self) -> u64 {
        self.hit_count()
    }

    fn hit_rate(&self) -> f64 {
        self.hit_rate()
    }
}

impl<K, V> Stats for crate::AdlfuCache<K, V>
where
    K: Clone + Eq + std::hash::Hash + Ord,
{
    fn get_count(&self) -> u64 {
        self.get_count()
    }

    fn set_count(&self) -> u64 {
        self.set_count()
    }

    fn del_count(&self) -> u64 {
        self.del_count()
    }

    fn hit_count(&self) -> u64 {
        self.hit_count()
    }

    fn hit_rate(&self) -> f64 {
        self.hit_rate()
    }
}

impl<K, V> Stats for crate::ArcCache<K, V>
where
    K: Clone + Eq + std::hash::Hash,
{
    fn get_count(&self) -> u64 {
        self.get_count()
    }

    fn set_count(&self) -> u64 {
        self.set_count()
    }

    fn del_count(&self) -> u64 {
        self.del_count()
    }

    fn hit_count(&self) -> u64 {
        self.hit_count()
    }

    fn hit_rate(&self) -> f64 {
        self.hit_rate()
    }
}
