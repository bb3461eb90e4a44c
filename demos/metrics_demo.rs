//! Demonstrates the `Stats` trait and DLFU's extended moment statistics.
//!
//! Run with: `cargo run --example metrics_demo`

use dlfu_cache::{Cache, DlfuCache, Stats};

fn main() {
    println!("Cache Statistics Demonstration");
    println!("===============================\n");

    let mut cache = DlfuCache::new(3, Some(3), 4.0).unwrap();

    cache.set("apple", 1);
    cache.set("banana", 2);
    cache.set("cherry", 3);

    let _ = cache.get(&"apple");
    let _ = cache.get(&"apple");
    let _ = cache.get(&"banana");
    let _ = cache.get(&"fig"); // miss

    cache.set("date", 4); // triggers an eviction
    cache.set("elderberry", 5); // triggers another eviction

    println!("Core stats (via the `Stats` trait):");
    println!("  get_count:  {}", cache.get_count());
    println!("  set_count:  {}", cache.set_count());
    println!("  del_count:  {}", cache.del_count());
    println!("  hit_count:  {}", cache.hit_count());
    println!("  hit_rate:   {:.3}", cache.hit_rate());

    println!("\nDLFU-specific moment statistics (no ARC equivalent):");
    println!("  mhit_count: {}", cache.mhit_count());
    println!("  mhit_rate:  {:.3}", cache.mhit_rate());
    println!("  thit_rate:  {:.3}", cache.thit_rate());
    println!("  count_avg:  {:.4}", cache.count_avg());
    println!("  count_dev:  {:.4}", cache.count_dev());
    println!("  count_min:  {:.4}", cache.count_min());

    println!("\nFinal cache size: {}", cache.len());
}
