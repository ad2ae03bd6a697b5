#![no_main]

use bcache::Bcache;
use bcache::hash::ContentHasher;
use libfuzzer_sys::fuzz_target;

// Fuzz property-based tests for Bcache
//
// Tests specific invariants and properties:
// - Idempotency of insert
// - No false dedup when every entry shares one half hash
// - Size accounting against the raw input
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let test_type = data[0] % 3;

    match test_type {
        0 => test_insert_idempotency(&data[1..]),
        1 => test_colliding_half_hash(&data[1..]),
        2 => test_size_accounting(&data[1..]),
        _ => unreachable!(),
    }
});

struct SharedHalf;

impl ContentHasher for SharedHalf {
    fn hash_bytes(&self, bytes: &[u8]) -> u32 {
        0xFFFF_0000 | u32::from(bytes.last().copied().unwrap_or(0) & 0x7)
    }
}

// Property: inserting the same window twice yields the same id
fn test_insert_idempotency(data: &[u8]) {
    let mut cache = Bcache::new();
    for window in data.chunks(3) {
        let (first, _) = cache.insert(window).unwrap();
        let (second, added) = cache.insert(window).unwrap();
        assert!(!added);
        assert_eq!(first, second);
    }
}

// Property: colliding half hashes never merge distinct payloads
fn test_colliding_half_hash(data: &[u8]) {
    let mut cache = Bcache::with_hasher(SharedHalf);
    let mut distinct: Vec<&[u8]> = data.chunks(2).collect();
    for window in &distinct {
        cache.insert(window).unwrap();
    }
    distinct.sort();
    distinct.dedup();
    assert_eq!(cache.len(), distinct.len());
    for window in distinct {
        let id = cache.find(window).unwrap();
        assert_eq!(cache.get(id), Some(window));
    }
    assert!(cache.check_invariants().is_ok());
}

// Property: byte counters match the inserted windows
fn test_size_accounting(data: &[u8]) {
    let mut cache = Bcache::new();
    let mut windows: Vec<&[u8]> = data.chunks(4).collect();
    for window in &windows {
        cache.insert(window).unwrap();
    }
    let stats = cache.stats();
    assert_eq!(stats.total_size, data.len() as u64);
    windows.sort();
    windows.dedup();
    let unique: u64 = windows.iter().map(|w| w.len() as u64).sum();
    assert_eq!(stats.unique_size, unique);
}
