//! Compares DLFU, ADLFU and ARC side by side under an identical workload.
//!
//! Run with: `cargo run --example cache_comparison`

use dlfu_cache::{AdlfuCache, ArcCache, Cache, DlfuCache, Stats};

fn main() {
    println!("Cache Implementation Comparison");
    println!("===============================");
    println!("Each cache has capacity of 3 items.");
    println!("We'll add 4 items to see eviction behavior, then access 'apple' repeatedly.");
    println!("Finally, we'll add 'elderberry' to see how each algorithm responds.\n");

    let mut dlfu = DlfuCache::new(3, None, 4.0).unwrap();
    let mut adlfu = AdlfuCache::new(3, None).unwrap();
    let mut arc = ArcCache::new(3).unwrap();

    let data = [("apple", 1), ("banana", 2), ("cherry", 3), ("date", 4)];

    for (key, value) in data {
        dlfu.set(key, value);
        adlfu.set(key, value);
        arc.set(key, value);
    }

    println!("After initial inserts:");
    report("DLFU", &dlfu);
    report("ADLFU", &adlfu);
    report("ARC", &arc);

    println!("\nAccessing 'apple' repeatedly...");
    for _ in 0..5 {
        let _ = dlfu.get(&"apple");
        let _ = adlfu.get(&"apple");
        let _ = arc.get(&"apple");
    }

    println!("\nAdding 'elderberry' to see different eviction behaviors...");
    dlfu.set("elderberry", 5);
    adlfu.set("elderberry", 5);
    arc.set("elderberry", 5);

    println!("\nFinal cache states:");
    report("DLFU", &dlfu);
    report("ADLFU", &adlfu);
    report("ARC", &arc);
}

fn report<C: Cache<&'static str, i32> + Stats>(name: &str, cache: &C) {
    println!(
        "  {name}: len={}, contains(apple)={}, get_count={}, hit_rate={:.2}",
        cache.len(),
        cache.contains(&"apple"),
        cache.get_count(),
        cache.hit_rate(),
    );
}
