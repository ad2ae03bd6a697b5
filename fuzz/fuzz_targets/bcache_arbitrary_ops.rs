#![no_main]

use std::collections::HashMap;

use bcache::{Bcache, BcacheId};
use bcache::builder::BcacheBuilder;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on Bcache
//
// The first byte picks the growth threshold; the rest is a stream of
// (op, len) pairs followed by `len` payload bytes. A HashMap shadow model
// checks that ids follow content exactly.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let threshold = usize::from(data[0] % 8) + 1;
    let mut cache = BcacheBuilder::new().chain_length_threshold(threshold).build();
    let mut model: HashMap<Vec<u8>, BcacheId> = HashMap::new();
    let mut inserts = 0u64;

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 4;
        let len = usize::from(data[idx + 1] % 16);
        idx += 2;
        let end = (idx + len).min(data.len());
        let payload = &data[idx..end];
        idx = end;

        match op {
            0 | 1 => {
                // Insert
                let (id, added) = cache.insert(payload).unwrap();
                inserts += 1;
                match model.get(payload) {
                    Some(&prev) => {
                        assert!(!added);
                        assert_eq!(prev, id);
                    }
                    None => {
                        assert!(added);
                        model.insert(payload.to_vec(), id);
                    }
                }
                assert_eq!(cache.get(id), Some(payload));
            }
            2 => {
                // Find (read-only)
                assert_eq!(cache.find(payload), model.get(payload).copied());
            }
            3 => {
                // Counters and structure
                let stats = cache.stats();
                assert_eq!(stats.total_count, inserts);
                assert_eq!(stats.unique_count, model.len() as u64);
                assert!(cache.check_invariants().is_ok());
            }
            _ => unreachable!(),
        }
    }

    let _ = Bcache::new().insert(data);
});
