//! Indexed priority queue: a key→score mapping with O(log n) arbitrary-key updates.
//!
//! This is the data structure the [`crate::dlfu::DlfuCache`] primary and shadow
//! partitions are built on. It is a binary min-heap of `(score, key)` pairs where each
//! entry also knows its own position in the heap, plus a secondary key→position index
//! that makes any operation that names a key directly reachable without a linear scan.
//!
//! `swap_min` is the operation the eviction cascade leans on: it replaces the current
//! minimum with a brand-new entry in a single sift-down, which is strictly cheaper than
//! a `pop_min` followed by a `set`.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{CacheError, Result};

#[derive(Debug, Clone)]
struct HeapNode<K> {
    key: K,
    score: f64,
}

/// A binary-heap-backed indexed priority queue.
///
/// Ties in score break on key comparison, so iteration and eviction order are fully
/// deterministic given a sequence of operations — required for the crate's test suite.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<K> {
    heap: Vec<HeapNode<K>>,
    index: HashMap<K, usize>,
}

impl<K: Clone + Eq + std::hash::Hash + Ord> Default for IndexedPriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + std::hash::Hash + Ord> IndexedPriorityQueue<K> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// The score stored for `key`, if present.
    pub fn get(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&pos| self.heap[pos].score)
    }

    /// Iterates over the keys currently stored, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }

    /// Inserts `key` with `score`, or updates its score if already present.
    pub fn set(&mut self, key: K, score: f64) {
        debug_assert!(!score.is_nan(), "IPQ scores must never be NaN");
        if let Some(&pos) = self.index.get(&key) {
            self.heap[pos].score = score;
            self.reheapify(pos);
        } else {
            let pos = self.heap.len();
            self.index.insert(key.clone(), pos);
            self.heap.push(HeapNode { key, score });
            self.sift_up(pos);
        }
    }

    /// Removes `key` and returns its score. Fails with [`CacheError::Miss`] if absent.
    pub fn delete(&mut self, key: &K) -> Result<f64> {
        let pos = self.index.remove(key).ok_or(CacheError::Miss)?;
        let removed = self.heap[pos].score;
        let last = self.heap.len() - 1;
        if pos != last {
            self.heap.swap(pos, last);
            let moved_key = self.heap[pos].key.clone();
            self.index.insert(moved_key, pos);
        }
        self.heap.pop();
        if pos < self.heap.len() {
            self.reheapify(pos);
        }
        Ok(removed)
    }

    /// Returns the minimum-score key and its score without removing it.
    ///
    /// Fails with [`CacheError::Empty`] on an empty queue.
    pub fn peek_min(&self) -> Result<(&K, f64)> {
        self.heap
            .first()
            .map(|node| (&node.key, node.score))
            .ok_or(CacheError::Empty)
    }

    /// Removes and returns the minimum-score entry.
    ///
    /// Fails with [`CacheError::Empty`] on an empty queue.
    pub fn pop_min(&mut self) -> Result<(K, f64)> {
        if self.heap.is_empty() {
            return Err(CacheError::Empty);
        }
        let root = self.heap.swap_remove(0);
        self.index.remove(&root.key);
        if !self.heap.is_empty() {
            let new_root_key = self.heap[0].key.clone();
            self.index.insert(new_root_key, 0);
            self.sift_down(0);
        }
        Ok((root.key, root.score))
    }

    /// Atomically replaces the current minimum with `(key, score)`, returning the
    /// displaced entry. Fails with [`CacheError::Empty`] on an empty queue.
    pub fn swap_min(&mut self, key: K, score: f64) -> Result<(K, f64)> {
        debug_assert!(!score.is_nan(), "IPQ scores must never be NaN");
        if self.heap.is_empty() {
            return Err(CacheError::Empty);
        }
        let old = self.heap[0].clone();
        self.index.remove(&old.key);
        self.heap[0] = HeapNode {
            key: key.clone(),
            score,
        };
        self.index.insert(key, 0);
        self.sift_down(0);
        Ok((old.key, old.score))
    }

    /// Atomically replaces the entry stored for `old_key` with `(key, score)`,
    /// returning the displaced entry. Fails with [`CacheError::Miss`] if `old_key` is
    /// absent.
    pub fn swap_key(&mut self, key: K, score: f64, old_key: &K) -> Result<(K, f64)> {
        debug_assert!(!score.is_nan(), "IPQ scores must never be NaN");
        let pos = self.index.remove(old_key).ok_or(CacheError::Miss)?;
        let old = self.heap[pos].clone();
        self.heap[pos] = HeapNode {
            key: key.clone(),
            score,
        };
        self.index.insert(key, pos);
        self.reheapify(pos);
        Ok((old.key, old.score))
    }

    /// Multiplies every stored score by `factor`. O(n). `factor` must be positive to
    /// preserve heap order.
    pub fn scale(&mut self, factor: f64) {
        debug_assert!(factor > 0.0, "scale factor must be positive");
        for node in &mut self.heap {
            node.score *= factor;
        }
    }

    /// Total order used to break score ties deterministically: lower score first, then
    /// lower key first.
    fn less(&self, a: usize, b: usize) -> bool {
        match self.heap[a].score.partial_cmp(&self.heap[b].score) {
            Some(Ordering::Less) => true,
            Some(Ordering::Greater) => false,
            Some(Ordering::Equal) => self.heap[a].key < self.heap[b].key,
            None => unreachable!("IPQ scores must never be NaN"),
        }
    }

    /// Restores the heap property at `pos` after its score changed, in whichever
    /// direction is needed.
    fn reheapify(&mut self, pos: usize) {
        if !self.sift_up(pos) {
            self.sift_down(pos);
        }
    }

    /// Moves the entry at `pos` up while it is smaller than its parent. Returns true if
    /// it moved.
    fn sift_up(&mut self, mut pos: usize) -> bool {
        let start = pos;
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.less(pos, parent) {
                self.swap_nodes(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
        pos != start
    }

    /// Moves the entry at `pos` down while it is larger than its smallest child.
    /// Returns true if it moved.
    fn sift_down(&mut self, mut pos: usize) -> bool {
        let start = pos;
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap_nodes(pos, smallest);
            pos = smallest;
        }
        pos != start
    }

    fn swap_nodes(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.index.insert(self.heap[a].key.clone(), a);
        self.index.insert(self.heap[b].key.clone(), b);
    }

    /// Checks the heap property and index consistency. Used by tests, not by normal
    /// operation.
    #[cfg(test)]
    fn check_invariants(&self) {
        for pos in 1..self.heap.len() {
            let parent = (pos - 1) / 2;
            assert!(
                !self.less(pos, parent),
                "heap property violated at {pos} (parent {parent})"
            );
        }
        assert_eq!(self.index.len(), self.heap.len());
        for (pos, node) in self.heap.iter().enumerate() {
            assert_eq!(self.index.get(&node.key), Some(&pos));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_errors() {
        let q: IndexedPriorityQueue<i32> = IndexedPriorityQueue::new();
        assert!(matches!(q.peek_min(), Err(CacheError::Empty)));
    }

    #[test]
    fn set_then_peek_min() {
        let mut q = IndexedPriorityQueue::new();
        q.set("a", 3.0);
        q.set("b", 1.0);
        q.set("c", 2.0);
        assert_eq!(q.peek_min().unwrap(), (&"b", 1.0));
        q.check_invariants();
    }

    #[test]
    fn update_existing_key_reheapifies() {
        let mut q = IndexedPriorityQueue::new();
        q.set("a", 1.0);
        q.set("b", 2.0);
        q.set("a", 5.0);
        assert_eq!(q.peek_min().unwrap(), (&"b", 2.0));
        q.check_invariants();
    }

    #[test]
    fn delete_missing_key_is_miss() {
        let mut q: IndexedPriorityQueue<&str> = IndexedPriorityQueue::new();
        q.set("a", 1.0);
        assert!(matches!(q.delete(&"z"), Err(CacheError::Miss)));
    }

    #[test]
    fn pop_min_drains_in_order() {
        let mut q = IndexedPriorityQueue::new();
        for (k, s) in [("a", 5.0), ("b", 1.0), ("c", 3.0), ("d", 2.0)] {
            q.set(k, s);
        }
        let mut popped = Vec::new();
        while let Ok((k, _)) = q.pop_min() {
            popped.push(k);
        }
        assert_eq!(popped, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn swap_min_replaces_root_in_one_step() {
        let mut q = IndexedPriorityQueue::new();
        q.set("a", 1.0);
        q.set("b", 2.0);
        q.set("c", 3.0);
        let (old_k, old_s) = q.swap_min("d", 10.0).unwrap();
        assert_eq!((old_k, old_s), ("a", 1.0));
        assert!(!q.contains(&"a"));
        assert!(q.contains(&"d"));
        assert_eq!(q.peek_min().unwrap(), (&"b", 2.0));
        q.check_invariants();
    }

    #[test]
    fn swap_key_replaces_named_entry() {
        let mut q = IndexedPriorityQueue::new();
        q.set("a", 1.0);
        q.set("b", 2.0);
        q.set("c", 3.0);
        let (old_k, old_s) = q.swap_key("z", 50.0, &"b").unwrap();
        assert_eq!((old_k, old_s), ("b", 2.0));
        assert!(!q.contains(&"b"));
        assert_eq!(q.get(&"z"), Some(50.0));
        q.check_invariants();
    }

    #[test]
    fn scale_preserves_relative_order() {
        let mut q = IndexedPriorityQueue::new();
        q.set("a", 1.0);
        q.set("b", 2.0);
        q.set("c", 4.0);
        q.scale(0.5);
        assert_eq!(q.get(&"a"), Some(0.5));
        assert_eq!(q.get(&"b"), Some(1.0));
        assert_eq!(q.get(&"c"), Some(2.0));
        assert_eq!(q.peek_min().unwrap().0, &"a");
        q.check_invariants();
    }

    #[test]
    fn ties_break_by_key_deterministically() {
        let mut q = IndexedPriorityQueue::new();
        q.set(3, 1.0);
        q.set(1, 1.0);
        q.set(2, 1.0);
        assert_eq!(q.peek_min().unwrap(), (&1, 1.0));
    }

    #[test]
    fn randomized_sequence_keeps_heap_invariant() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        let mut q = IndexedPriorityQueue::new();
        for _ in 0..500 {
            let key: i32 = rng.gen_range(0..50);
            let score: f64 = rng.gen_range(0.0..100.0);
            if rng.gen_bool(0.8) || !q.contains(&key) {
                q.set(key, score);
            } else {
                let _ = q.delete(&key);
            }
            q.check_invariants();
        }
    }
}
